//! Cells and element families of traces onto embedded meshes.

use crate::{error::EmbeddingError, mesh::SimplicialMesh, Dim, Result};

use std::fmt;

/// Reference cell of a simplicial mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
  Vertex,
  Interval,
  Triangle,
  Tetrahedron,
}

impl CellType {
  pub fn from_dim(dim: Dim) -> Result<Self> {
    match dim {
      0 => Ok(Self::Vertex),
      1 => Ok(Self::Interval),
      2 => Ok(Self::Triangle),
      3 => Ok(Self::Tetrahedron),
      _ => Err(EmbeddingError::UnsupportedCell(format!(
        "no reference cell of dimension {dim}"
      ))),
    }
  }
  pub fn of_mesh(mesh: &SimplicialMesh) -> Result<Self> {
    Self::from_dim(mesh.dim_intrinsic())
  }

  pub fn dim(self) -> Dim {
    match self {
      Self::Vertex => 0,
      Self::Interval => 1,
      Self::Triangle => 2,
      Self::Tetrahedron => 3,
    }
  }
  pub fn nvertices(self) -> usize {
    self.dim() + 1
  }

  /// The cell of the facets.
  pub fn trace_cell(self) -> Result<Self> {
    match self {
      Self::Tetrahedron => Ok(Self::Triangle),
      Self::Triangle => Ok(Self::Interval),
      Self::Interval => Ok(Self::Vertex),
      Self::Vertex => Err(EmbeddingError::UnsupportedCell(
        "a vertex has no facets".into(),
      )),
    }
  }
}

impl fmt::Display for CellType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Vertex => "vertex",
      Self::Interval => "interval",
      Self::Triangle => "triangle",
      Self::Tetrahedron => "tetrahedron",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementFamily {
  Lagrange,
  DiscontinuousLagrange,
  CrouzeixRaviart,
  RaviartThomas,
  Nedelec,
}

impl ElementFamily {
  /// The family the traces of this family live in.
  ///
  /// Continuous Lagrange functions have continuous Lagrange traces.
  /// Everything else is traced into discontinuous Lagrange.
  pub fn trace_family(self) -> Self {
    match self {
      Self::Lagrange => Self::Lagrange,
      Self::DiscontinuousLagrange
      | Self::CrouzeixRaviart
      | Self::RaviartThomas
      | Self::Nedelec => Self::DiscontinuousLagrange,
    }
  }
}

/// How a function is restricted to a facet shared by two cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Restriction {
  /// Only meaningful for continuous functions.
  #[default]
  None,
  Plus,
  Minus,
  Jump,
  Average,
}

impl Restriction {
  /// Whether the sides of the facet have to be told apart by a normal.
  pub fn needs_normal(self) -> bool {
    !matches!(self, Self::None)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FiniteElement {
  pub family: ElementFamily,
  pub cell: CellType,
  pub degree: usize,
}

/// The element of traces of some element onto an embedded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceElement {
  pub element: FiniteElement,
  pub restriction: Restriction,
}

impl TraceElement {
  /// The cells of `emesh` must be the facet cells of `element`.
  pub fn for_mesh(
    element: &FiniteElement,
    emesh: &SimplicialMesh,
    restriction: Restriction,
  ) -> Result<Self> {
    let trace_cell = element.cell.trace_cell()?;
    let cell = CellType::of_mesh(emesh)?;
    if cell != trace_cell {
      return Err(EmbeddingError::DimensionMismatch {
        expected: trace_cell.dim(),
        found: cell.dim(),
        context: "embedded mesh cells are not the facets of the element cell",
      });
    }
    Ok(Self {
      element: FiniteElement {
        family: element.family.trace_family(),
        cell,
        degree: element.degree,
      },
      restriction,
    })
  }
}
