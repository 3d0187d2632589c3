//! Unit normals of manifold meshes, constant on every cell.

use crate::{
  combo::Sign,
  error::EmbeddingError,
  geometry::coord::{Coord, CoordRef},
  mesh::SimplicialMesh,
  topology::CellIdx,
  Result,
};

use std::fmt;

/// Picks the sign of the normal: it points along the hint vector.
pub enum Orientation {
  /// Hint `x - x0`, pointing away from the point `x0`.
  Point(Coord),
  /// Hint given by a vector field.
  Field(Box<dyn Fn(CoordRef) -> Coord>),
}

impl Orientation {
  pub fn away_from(x0: Coord) -> Self {
    Self::Point(x0)
  }
  pub fn field(f: impl Fn(CoordRef) -> Coord + 'static) -> Self {
    Self::Field(Box::new(f))
  }

  pub fn hint(&self, x: CoordRef) -> Coord {
    match self {
      Self::Point(x0) => x - x0,
      Self::Field(f) => f(x),
    }
  }
}

impl fmt::Debug for Orientation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Point(x0) => f.debug_tuple("Point").field(&x0.as_slice()).finish(),
      Self::Field(_) => f.write_str("Field(..)"),
    }
  }
}

/// One vector per cell, stored in the columns of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CellVectorField {
  values: na::DMatrix<f64>,
}

impl CellVectorField {
  pub fn ncells(&self) -> usize {
    self.values.ncols()
  }
  pub fn dim(&self) -> usize {
    self.values.nrows()
  }
  pub fn values(&self) -> &na::DMatrix<f64> {
    &self.values
  }
  pub fn cell_value(&self, icell: CellIdx) -> CoordRef {
    self.values.column(icell)
  }
}

impl std::ops::Neg for CellVectorField {
  type Output = Self;
  fn neg(self) -> Self::Output {
    Self {
      values: -self.values,
    }
  }
}

/// Unit normals agreeing with the orientation hint at the cell midpoints.
///
/// For cells of codimension one this is the hypersurface normal.
/// Otherwise it is the part of the hint orthogonal to the cell.
pub fn outer_normal(mesh: &SimplicialMesh, orientation: &Orientation) -> Result<CellVectorField> {
  let dim = mesh.dim_ambient();
  if mesh.dim_intrinsic() == 0 || !mesh.is_immersed() {
    return Err(EmbeddingError::DimensionMismatch {
      expected: dim.saturating_sub(1),
      found: mesh.dim_intrinsic(),
      context: "normals need a manifold mesh of dimension at least 1",
    });
  }
  if let Orientation::Point(x0) = orientation {
    if x0.len() != dim {
      return Err(EmbeddingError::DimensionMismatch {
        expected: dim,
        found: x0.len(),
        context: "orientation point",
      });
    }
  }

  let mut values = na::DMatrix::zeros(dim, mesh.ncells());
  for icell in 0..mesh.ncells() {
    let cell = mesh.cell_coords(icell);
    let hint = orientation.hint(cell.barycenter().as_view());
    if hint.len() != dim {
      return Err(EmbeddingError::DimensionMismatch {
        expected: dim,
        found: hint.len(),
        context: "orientation field value",
      });
    }

    let normal = match cell.hypersurface_normal() {
      Some(normal) => normal,
      None => cell
        .normal_component(hint.as_view())
        .ok_or(EmbeddingError::DegenerateCell { cell: icell })?,
    };
    let norm = normal.norm();
    if norm == 0.0 {
      return Err(EmbeddingError::DegenerateCell { cell: icell });
    }
    let sign = Sign::from_bool(hint.dot(&normal) >= 0.0);
    values.set_column(icell, &(sign.as_f64() / norm * normal));
  }
  Ok(CellVectorField { values })
}

/// The negated [`outer_normal`].
pub fn inner_normal(mesh: &SimplicialMesh, orientation: &Orientation) -> Result<CellVectorField> {
  outer_normal(mesh, orientation).map(|n| -n)
}
