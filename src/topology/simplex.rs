use super::VertexIdx;
use crate::{combo::binomial, Dim};

use itertools::Itertools;

/// A simplex given by its vertices.
///
/// The order of the vertices is kept as given. Entities of a complex
/// are always stored sorted, cells of a mesh keep the order they were created with.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Simplex {
  pub vertices: Vec<VertexIdx>,
}

impl Simplex {
  pub fn new(vertices: Vec<VertexIdx>) -> Self {
    Self { vertices }
  }
  pub fn single(v: VertexIdx) -> Self {
    Self::new(vec![v])
  }
  pub fn standard(dim: Dim) -> Self {
    Self::new((0..=dim).collect())
  }

  pub fn nvertices(&self) -> usize {
    self.vertices.len()
  }
  pub fn dim(&self) -> Dim {
    self.nvertices() - 1
  }
  pub fn iter(&self) -> std::slice::Iter<'_, VertexIdx> {
    self.vertices.iter()
  }

  pub fn is_sorted(&self) -> bool {
    self.vertices.windows(2).all(|w| w[0] <= w[1])
  }
  pub fn sorted(mut self) -> Self {
    self.vertices.sort_unstable();
    self
  }

  pub fn has_vertex(&self, v: VertexIdx) -> bool {
    self.vertices.contains(&v)
  }
  pub fn has_duplicate_vertices(&self) -> bool {
    !self.vertices.iter().all_unique()
  }

  /// The `dim_sub`-subsimplicies of this simplex.
  ///
  /// These are ordered lexicographically w.r.t. the local vertex indices,
  /// e.g. tet.subsimps(1) = [(0,1),(0,2),(0,3),(1,2),(1,3),(2,3)].
  /// A sorted simplex has sorted subsimplicies.
  pub fn subsimps(&self, dim_sub: Dim) -> impl Iterator<Item = Simplex> + '_ {
    self
      .vertices
      .iter()
      .copied()
      .combinations(dim_sub + 1)
      .map(Simplex::new)
  }

  pub fn is_subsimp_of(&self, other: &Self) -> bool {
    self.iter().all(|v| other.has_vertex(*v))
  }
}

impl From<Vec<VertexIdx>> for Simplex {
  fn from(vertices: Vec<VertexIdx>) -> Self {
    Self::new(vertices)
  }
}
impl<const N: usize> From<[VertexIdx; N]> for Simplex {
  fn from(vertices: [VertexIdx; N]) -> Self {
    Self::new(vertices.to_vec())
  }
}
impl std::ops::Index<usize> for Simplex {
  type Output = VertexIdx;
  fn index(&self, ivertex: usize) -> &Self::Output {
    &self.vertices[ivertex]
  }
}
impl<'a> IntoIterator for &'a Simplex {
  type Item = &'a VertexIdx;
  type IntoIter = std::slice::Iter<'a, VertexIdx>;
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

pub fn nsubsimplicies(dim_cell: Dim, dim_sub: Dim) -> usize {
  binomial(dim_cell + 1, dim_sub + 1)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn tet_subsimplicies() {
    let tet = Simplex::standard(3);
    let edges: Vec<_> = tet.subsimps(1).map(|e| e.vertices).collect();
    assert_eq!(
      edges,
      vec![
        vec![0, 1],
        vec![0, 2],
        vec![0, 3],
        vec![1, 2],
        vec![1, 3],
        vec![2, 3]
      ]
    );
    for dim_sub in 0..=3 {
      assert_eq!(tet.subsimps(dim_sub).count(), nsubsimplicies(3, dim_sub));
    }
  }

  #[test]
  fn sorting_keeps_vertex_set() {
    let simp = Simplex::from([7, 2, 5]);
    assert!(!simp.is_sorted());
    let sorted = simp.clone().sorted();
    assert_eq!(sorted.vertices, vec![2, 5, 7]);
    assert!(simp.is_subsimp_of(&sorted) && sorted.is_subsimp_of(&simp));
    assert!(Simplex::from([1, 2, 1]).has_duplicate_vertices());
  }
}
