use super::{aabb::Aabb, refsimp_vol};
use crate::{
  topology::{simplex::Simplex, VertexIdx},
  Dim,
};

pub type Coord = na::DVector<f64>;
pub type CoordRef<'a> = na::DVectorView<'a, f64>;

/// The coordinates of the vertices of a mesh, stored in the columns of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCoords {
  matrix: na::DMatrix<f64>,
}

impl MeshCoords {
  pub fn new(matrix: na::DMatrix<f64>) -> Self {
    Self { matrix }
  }
  /// Row-major `nvertices x dim` data, as it is usually stored in mesh files.
  pub fn from_row_major(dim: Dim, data: &[f64]) -> Self {
    let nvertices = if dim == 0 { 0 } else { data.len() / dim };
    Self::new(na::DMatrix::from_column_slice(dim, nvertices, data))
  }

  pub fn matrix(&self) -> &na::DMatrix<f64> {
    &self.matrix
  }
  pub fn into_matrix(self) -> na::DMatrix<f64> {
    self.matrix
  }

  pub fn dim(&self) -> Dim {
    self.matrix.nrows()
  }
  pub fn nvertices(&self) -> usize {
    self.matrix.ncols()
  }

  pub fn coord(&self, ivertex: VertexIdx) -> CoordRef {
    self.matrix.column(ivertex)
  }
  pub fn coord_iter(&self) -> impl ExactSizeIterator<Item = CoordRef> + '_ {
    (0..self.nvertices()).map(|ivertex| self.coord(ivertex))
  }

  /// The coordinates of the given vertices, in the given order.
  pub fn gather(&self, vertices: &[VertexIdx]) -> MeshCoords {
    Self::new(self.matrix.select_columns(vertices))
  }

  pub fn bounding_box(&self) -> Aabb {
    Aabb::from_points(self.dim(), self.coord_iter())
  }

  pub fn embed_euclidean(mut self, dim: Dim) -> MeshCoords {
    let old_dim = self.matrix.nrows();
    self.matrix = self.matrix.insert_rows(old_dim, dim - old_dim, 0.0);
    self
  }
}

impl From<na::DMatrix<f64>> for MeshCoords {
  fn from(matrix: na::DMatrix<f64>) -> Self {
    Self::new(matrix)
  }
}
impl From<&[Coord]> for MeshCoords {
  fn from(vectors: &[Coord]) -> Self {
    Self::new(na::DMatrix::from_columns(vectors))
  }
}

/// A single simplex realized by vertex coordinates.
#[derive(Debug, Clone)]
pub struct SimplexCoords {
  pub vertices: MeshCoords,
}

impl SimplexCoords {
  pub fn new(vertices: na::DMatrix<f64>) -> Self {
    Self {
      vertices: vertices.into(),
    }
  }
  pub fn standard(ndim: Dim) -> Self {
    let mut vertices = na::DMatrix::zeros(ndim, ndim + 1);
    for i in 0..ndim {
      vertices[(i, i + 1)] = 1.0;
    }
    Self::new(vertices)
  }
  pub fn from_simplex_and_coords(simp: &Simplex, coords: &MeshCoords) -> Self {
    Self {
      vertices: coords.gather(&simp.vertices),
    }
  }

  pub fn nvertices(&self) -> usize {
    self.vertices.nvertices()
  }
  pub fn dim_intrinsic(&self) -> Dim {
    self.nvertices() - 1
  }
  pub fn dim_ambient(&self) -> Dim {
    self.vertices.dim()
  }
  pub fn is_same_dim(&self) -> bool {
    self.dim_intrinsic() == self.dim_ambient()
  }

  pub fn coord(&self, ivertex: usize) -> CoordRef {
    self.vertices.coord(ivertex)
  }
  pub fn base_vertex(&self) -> CoordRef {
    self.coord(0)
  }

  pub fn spanning_vectors(&self) -> na::DMatrix<f64> {
    let mut mat = na::DMatrix::zeros(self.dim_ambient(), self.dim_intrinsic());
    let v0 = self.base_vertex();
    for (i, vi) in self.vertices.coord_iter().skip(1).enumerate() {
      mat.set_column(i, &(vi - v0));
    }
    mat
  }

  /// Signed volume for full dimensional simplices, volume otherwise.
  pub fn det(&self) -> f64 {
    if self.dim_intrinsic() == 0 {
      return 1.0;
    }
    let spanning = self.spanning_vectors();
    let det = if self.is_same_dim() {
      spanning.determinant()
    } else {
      (spanning.transpose() * &spanning).determinant().max(0.0).sqrt()
    };
    refsimp_vol(self.dim_intrinsic()) * det
  }
  pub fn vol(&self) -> f64 {
    self.det().abs()
  }

  /// The maximum distance of two points inside the simplex.
  pub fn diameter(&self) -> f64 {
    let mut diameter: f64 = 0.0;
    for i in 0..self.nvertices() {
      for j in (i + 1)..self.nvertices() {
        diameter = diameter.max((self.coord(j) - self.coord(i)).norm());
      }
    }
    diameter
  }

  pub fn barycenter(&self) -> Coord {
    let mut barycenter = Coord::zeros(self.dim_ambient());
    self.vertices.coord_iter().for_each(|v| barycenter += v);
    barycenter /= self.nvertices() as f64;
    barycenter
  }

  /// Barycentric coordinates of the (orthogonal projection of the) point.
  ///
  /// `None` for degenerate simplices.
  pub fn global2bary(&self, global: CoordRef) -> Option<Coord> {
    let diff = global - self.base_vertex();
    let local = if self.dim_intrinsic() == 0 {
      Coord::zeros(0)
    } else {
      let pinv = self.spanning_vectors().pseudo_inverse(1e-14).ok()?;
      pinv * diff
    };
    let bary0 = 1.0 - local.sum();
    Some(local.insert_row(0, bary0))
  }
  pub fn bary2global(&self, bary: CoordRef) -> Coord {
    self
      .vertices
      .coord_iter()
      .zip(bary.iter())
      .map(|(vi, &baryi)| baryi * vi)
      .fold(Coord::zeros(self.dim_ambient()), |acc, v| acc + v)
  }

  /// Whether the point lies inside the closed simplex.
  ///
  /// `eps` is the slack of the barycentric coordinates. For simplices of lower
  /// dimension than the ambient space, the distance to the affine hull must
  /// also be below `eps` times the diameter.
  pub fn is_global_inside(&self, global: CoordRef, eps: f64) -> bool {
    let Some(bary) = self.global2bary(global) else {
      return false;
    };
    if bary.iter().any(|&b| b < -eps) {
      return false;
    }
    if self.is_same_dim() {
      return true;
    }
    let projected = self.bary2global(bary.as_view());
    let scale = self.diameter().max(f64::MIN_POSITIVE);
    (projected - global).norm() <= eps * scale
  }

  /// The normal vector of a hypersurface simplex (codim 1).
  ///
  /// Generalized cross product of the spanning vectors, its length is the
  /// volume of the parallelotope. `None` if the simplex is not of codim 1.
  pub fn hypersurface_normal(&self) -> Option<Coord> {
    if self.dim_intrinsic() + 1 != self.dim_ambient() {
      return None;
    }
    let spanning = self.spanning_vectors();
    let normal = Coord::from_iterator(
      self.dim_ambient(),
      (0..self.dim_ambient()).map(|i| {
        let minor = spanning.clone().remove_row(i);
        let cofactor = if minor.nrows() == 0 {
          1.0
        } else {
          minor.determinant()
        };
        if i % 2 == 0 {
          cofactor
        } else {
          -cofactor
        }
      }),
    );
    Some(normal)
  }

  /// Component of `vector` orthogonal to the tangent space of the simplex.
  pub fn normal_component(&self, vector: CoordRef) -> Option<Coord> {
    if self.dim_intrinsic() == 0 {
      return Some(vector.into_owned());
    }
    let spanning = self.spanning_vectors();
    let gram_inv = (spanning.transpose() * &spanning).try_inverse()?;
    let tangential = &spanning * (gram_inv * (spanning.transpose() * vector));
    Some(vector - tangential)
  }

  pub fn bounding_box(&self) -> Aabb {
    self.vertices.bounding_box()
  }
}
