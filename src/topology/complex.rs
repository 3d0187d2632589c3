use super::{
  simplex::{nsubsimplicies, Simplex},
  skeleton::Skeleton,
  CellIdx, KSimplexIdx, VertexIdx,
};
use crate::Dim;

use indexmap::IndexMap;
use itertools::Itertools;

/// All entities of a simplicial mesh, numbered per dimension.
///
/// Vertices keep the numbering of the mesh. Entities of higher dimension are
/// numbered in the order in which they are first encountered when iterating
/// the cells and their lexicographically ordered subsimplices.
#[derive(Debug, Clone)]
pub struct Complex {
  skeletons: Vec<ComplexSkeleton>,
  /// `cell_subs[d][icell]` are the d-entities of cell `icell`.
  cell_subs: Vec<Vec<Vec<KSimplexIdx>>>,
}

/// Sorted entity simplex together with its cells.
pub type ComplexSkeleton = IndexMap<Simplex, SimplexData>;

#[derive(Default, Debug, Clone)]
pub struct SimplexData {
  /// The cells containing this simplex, in increasing order.
  pub cocells: Vec<CellIdx>,
}

impl Complex {
  pub fn from_cells(cells: &Skeleton, nvertices: usize) -> Self {
    let dim = cells.dim();

    let mut skeletons = vec![ComplexSkeleton::new(); dim + 1];
    skeletons[0] = (0..nvertices)
      .map(|v| (Simplex::single(v), SimplexData::default()))
      .collect();

    let mut cell_subs: Vec<Vec<Vec<KSimplexIdx>>> = (0..=dim)
      .map(|_| Vec::with_capacity(cells.len()))
      .collect();

    for (icell, cell) in cells.iter().enumerate() {
      let cell = cell.clone().sorted();
      for (dim_sub, subs) in skeletons.iter_mut().enumerate() {
        let mut kidxs = Vec::with_capacity(nsubsimplicies(dim, dim_sub));
        for sub in cell.subsimps(dim_sub) {
          let entry = subs.entry(sub);
          kidxs.push(entry.index());
          entry.or_default().cocells.push(icell);
        }
        cell_subs[dim_sub].push(kidxs);
      }
    }

    Self {
      skeletons,
      cell_subs,
    }
  }

  pub fn dim(&self) -> Dim {
    self.skeletons.len() - 1
  }
  pub fn skeleton(&self, dim: Dim) -> &ComplexSkeleton {
    &self.skeletons[dim]
  }
  pub fn nsimplicies(&self, dim: Dim) -> usize {
    self.skeletons[dim].len()
  }
  pub fn nvertices(&self) -> usize {
    self.nsimplicies(0)
  }
  pub fn ncells(&self) -> usize {
    self.nsimplicies(self.dim())
  }

  /// The sorted vertices of an entity (entity -> vertex incidence).
  pub fn simplex(&self, dim: Dim, kidx: KSimplexIdx) -> &Simplex {
    self.skeletons[dim]
      .get_index(kidx)
      .expect("entity index out of range")
      .0
  }
  pub fn simplex_data(&self, dim: Dim, kidx: KSimplexIdx) -> &SimplexData {
    self.skeletons[dim]
      .get_index(kidx)
      .expect("entity index out of range")
      .1
  }
  pub fn cocells(&self, dim: Dim, kidx: KSimplexIdx) -> &[CellIdx] {
    &self.simplex_data(dim, kidx).cocells
  }
  pub fn kidx_by_simplex(&self, simp: &Simplex) -> Option<KSimplexIdx> {
    let sorted = simp.clone().sorted();
    self.skeletons.get(sorted.dim())?.get_index_of(&sorted)
  }

  /// The d-entities of a cell (cell -> entity incidence).
  pub fn cell_subs(&self, dim: Dim, icell: CellIdx) -> &[KSimplexIdx] {
    &self.cell_subs[dim][icell]
  }
  /// The vertices of a cell, sorted.
  pub fn cell_vertices(&self, icell: CellIdx) -> &[VertexIdx] {
    self.cell_subs(0, icell)
  }

  /// Every facet (codim 1 entity) borders at most two cells.
  pub fn is_manifold(&self) -> bool {
    if self.dim() == 0 {
      return true;
    }
    self.skeletons[self.dim() - 1]
      .values()
      .all(|data| matches!(data.cocells.len(), 1 | 2))
  }

  pub fn has_boundary(&self) -> bool {
    !self.boundary_facets().is_empty()
  }

  /// For a d-mesh computes the boundary, which consists of facets ((d-1)-subs).
  ///
  /// The boundary facets are characterized by the fact that they
  /// only have 1 cell as super entity.
  pub fn boundary_facets(&self) -> Vec<KSimplexIdx> {
    if self.dim() == 0 {
      return Vec::new();
    }
    self.skeletons[self.dim() - 1]
      .values()
      .enumerate()
      .filter(|(_, data)| data.cocells.len() == 1)
      .map(|(kidx, _)| kidx)
      .collect()
  }

  /// The vertices that lie on the boundary of the mesh, sorted.
  pub fn boundary_vertices(&self) -> Vec<VertexIdx> {
    self
      .boundary_facets()
      .into_iter()
      .flat_map(|facet| self.simplex(self.dim() - 1, facet).vertices.clone())
      .unique()
      .sorted()
      .collect()
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn two_triangles() -> Complex {
    let cells = Skeleton::new(vec![Simplex::from([0, 1, 2]), Simplex::from([1, 3, 2])]).unwrap();
    Complex::from_cells(&cells, 4)
  }

  #[test]
  fn incidence() {
    let dim = 3;
    let complex = Complex::from_cells(&Skeleton::standard(dim), dim + 1);
    let cell = Simplex::standard(dim);
    for dim_sub in 0..=dim {
      let subs = complex.cell_subs(dim_sub, 0);
      assert_eq!(subs.len(), nsubsimplicies(dim, dim_sub));
      assert_eq!(complex.nsimplicies(dim_sub), nsubsimplicies(dim, dim_sub));
      for (&kidx, expected) in subs.iter().zip(cell.subsimps(dim_sub)) {
        assert_eq!(*complex.simplex(dim_sub, kidx), expected);
        assert_eq!(complex.cocells(dim_sub, kidx), &[0]);
      }
    }
  }

  #[test]
  fn shared_edge() {
    let complex = two_triangles();
    assert_eq!(complex.nsimplicies(1), 5);
    let shared = complex.kidx_by_simplex(&Simplex::from([2, 1])).unwrap();
    assert_eq!(complex.cocells(1, shared), &[0, 1]);
    assert!(complex.cell_subs(1, 0).contains(&shared));
    assert!(complex.cell_subs(1, 1).contains(&shared));
    assert_eq!(complex.cell_vertices(1), &[1, 2, 3]);
  }

  #[test]
  fn boundary() {
    let complex = two_triangles();
    assert!(complex.is_manifold());
    assert_eq!(complex.boundary_facets().len(), 4);
    assert_eq!(complex.boundary_vertices(), vec![0, 1, 2, 3]);
  }

  #[test]
  fn isolated_vertices_are_numbered() {
    let cells = Skeleton::new(vec![Simplex::from([0, 2])]).unwrap();
    let complex = Complex::from_cells(&cells, 4);
    assert_eq!(complex.nvertices(), 4);
    assert!(complex.cocells(0, 3).is_empty());
  }
}
