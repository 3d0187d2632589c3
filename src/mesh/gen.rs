//! Structured simplicial meshes of axis aligned boxes.

use super::SimplicialMesh;
use crate::{
  geometry::{
    aabb::Aabb,
    coord::{Coord, MeshCoords},
  },
  topology::{simplex::Simplex, VertexIdx},
  Dim, Result,
};

use itertools::Itertools;

/// converts linear index to cartesian index
///
/// converts linear index in 0..dim_len^d to cartesian index in (0)^d..(dim_len)^d
pub fn linear_index2cartesian_index(
  mut lin_idx: usize,
  dim_len: usize,
  dim: usize,
) -> na::DVector<usize> {
  let mut cart_idx = na::DVector::zeros(dim);
  for icomp in 0..dim {
    cart_idx[icomp] = lin_idx % dim_len;
    lin_idx /= dim_len;
  }
  cart_idx
}

/// converts cartesian index to linear index
///
/// converts cartesian index in (0)^d..(dim_len)^d to linear index in 0..dim_len^d
pub fn cartesian_index2linear_index(cart_idx: &na::DVector<usize>, dim_len: usize) -> usize {
  cart_idx
    .iter()
    .rev()
    .fold(0, |lin_idx, &icomp| lin_idx * dim_len + icomp)
}

/// A box `[min, max]` subdivided into `ncells_axis^d` congruent subboxes,
/// each of which is split into `d!` simplices (Kuhn triangulation).
#[derive(Debug, Clone)]
pub struct CartesianMeshInfo {
  domain: Aabb,
  ncells_axis: usize,
}

// constructors
impl CartesianMeshInfo {
  pub fn new_min_max(min: Coord, max: Coord, ncells_axis: usize) -> Self {
    assert!(ncells_axis > 0, "need at least one cell per axis");
    let domain = Aabb::new(min, max);
    assert!(!domain.is_empty(), "box has min > max");
    Self {
      domain,
      ncells_axis,
    }
  }
  pub fn new_unit(dim: Dim, ncells_axis: usize) -> Self {
    Self::new_min_max(
      Coord::zeros(dim),
      Coord::from_element(dim, 1.0),
      ncells_axis,
    )
  }
}

// getters
impl CartesianMeshInfo {
  pub fn dim(&self) -> Dim {
    self.domain.dim()
  }
  pub fn domain(&self) -> &Aabb {
    &self.domain
  }
  pub fn ncells_axis(&self) -> usize {
    self.ncells_axis
  }
  pub fn nvertices_axis(&self) -> usize {
    self.ncells_axis + 1
  }
  pub fn nboxes(&self) -> usize {
    self.ncells_axis.pow(self.dim() as u32)
  }
  pub fn nvertices(&self) -> usize {
    self.nvertices_axis().pow(self.dim() as u32)
  }

  pub fn vertex_cart_idx(&self, ivertex: VertexIdx) -> na::DVector<usize> {
    linear_index2cartesian_index(ivertex, self.nvertices_axis(), self.dim())
  }
  pub fn vertex_pos(&self, ivertex: VertexIdx) -> Coord {
    (self.vertex_cart_idx(ivertex).cast::<f64>() / self.ncells_axis as f64)
      .component_mul(&self.domain.side_lengths())
      + self.domain.min()
  }

  pub fn is_vertex_on_boundary(&self, ivertex: VertexIdx) -> bool {
    self
      .vertex_cart_idx(ivertex)
      .iter()
      .any(|&c| c == 0 || c == self.ncells_axis)
  }
}

impl CartesianMeshInfo {
  pub fn compute_vertex_coords(&self) -> MeshCoords {
    let mut vertices = na::DMatrix::zeros(self.dim(), self.nvertices());
    for (ivertex, mut coord) in vertices.column_iter_mut().enumerate() {
      coord.copy_from(&self.vertex_pos(ivertex));
    }
    MeshCoords::new(vertices)
  }

  pub fn compute_cells(&self) -> Vec<Simplex> {
    let dim = self.dim();
    let nvertices_axis = self.nvertices_axis();
    let mut cells = Vec::with_capacity(self.nboxes() * (1..=dim).product::<usize>());

    for ibox in 0..self.nboxes() {
      let origin = linear_index2cartesian_index(ibox, self.ncells_axis, dim);

      // Every permutation of the axes gives rise to one simplex,
      // obtained by walking from the box origin one axis after another.
      for axes in (0..dim).permutations(dim) {
        let mut vertex = origin.clone();
        let mut vertices = Vec::with_capacity(dim + 1);
        vertices.push(cartesian_index2linear_index(&vertex, nvertices_axis));
        for axis in axes {
          vertex[axis] += 1;
          vertices.push(cartesian_index2linear_index(&vertex, nvertices_axis));
        }
        let simplex = Simplex::new(vertices);
        debug_assert!(simplex.is_sorted());
        cells.push(simplex);
      }
    }
    cells
  }

  pub fn compute_mesh(&self) -> Result<SimplicialMesh> {
    SimplicialMesh::new(self.compute_cells(), self.compute_vertex_coords())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn unit_cube_mesh() {
    let info = CartesianMeshInfo::new_unit(3, 1);
    #[rustfmt::skip]
    let expected_coords = na::DMatrix::from_column_slice(3, 8, &[
      0., 0., 0.,
      1., 0., 0.,
      0., 1., 0.,
      1., 1., 0.,
      0., 0., 1.,
      1., 0., 1.,
      0., 1., 1.,
      1., 1., 1.,
    ]);
    assert_eq!(*info.compute_vertex_coords().matrix(), expected_coords);

    let cells: Vec<_> = info.compute_cells().into_iter().map(|c| c.vertices).collect();
    let expected_cells = vec![
      vec![0, 1, 3, 7],
      vec![0, 1, 5, 7],
      vec![0, 2, 3, 7],
      vec![0, 2, 6, 7],
      vec![0, 4, 5, 7],
      vec![0, 4, 6, 7],
    ];
    assert_eq!(cells, expected_cells);
  }

  #[test]
  fn unit_square_mesh() {
    let info = CartesianMeshInfo::new_unit(2, 2);
    #[rustfmt::skip]
    let expected_coords = na::DMatrix::from_column_slice(2, 9, &[
      0.0, 0.0,
      0.5, 0.0,
      1.0, 0.0,
      0.0, 0.5,
      0.5, 0.5,
      1.0, 0.5,
      0.0, 1.0,
      0.5, 1.0,
      1.0, 1.0,
    ]);
    assert_eq!(*info.compute_vertex_coords().matrix(), expected_coords);

    let cells: Vec<_> = info.compute_cells().into_iter().map(|c| c.vertices).collect();
    let expected_cells = vec![
      vec![0, 1, 4],
      vec![0, 3, 4],
      vec![1, 2, 5],
      vec![1, 4, 5],
      vec![3, 4, 7],
      vec![3, 6, 7],
      vec![4, 5, 8],
      vec![4, 7, 8],
    ];
    assert_eq!(cells, expected_cells);
  }

  #[test]
  fn box_volume() {
    let min = Coord::from_vec(vec![-1., -1., -1.]);
    let max = Coord::from_vec(vec![1., 1., 1.]);
    let mesh = CartesianMeshInfo::new_min_max(min, max, 3)
      .compute_mesh()
      .unwrap();
    assert_eq!(mesh.ncells(), 6 * 27);
    assert_eq!(mesh.nvertices(), 64);
    assert_relative_eq!(mesh.volume(), 8.0, epsilon = 1e-12);
    assert_eq!(mesh.complex().boundary_facets().len(), 6 * 9 * 2);

    let info = CartesianMeshInfo::new_unit(3, 3);
    let boundary_vertices: Vec<_> = (0..info.nvertices())
      .filter(|&v| info.is_vertex_on_boundary(v))
      .collect();
    assert_eq!(boundary_vertices, mesh.complex().boundary_vertices());
  }

  #[test]
  fn index_conversion() {
    for lin_idx in 0..27 {
      let cart_idx = linear_index2cartesian_index(lin_idx, 3, 3);
      assert_eq!(cartesian_index2linear_index(&cart_idx, 3), lin_idx);
    }
  }
}
