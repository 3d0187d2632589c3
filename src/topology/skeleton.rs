use super::{simplex::Simplex, KSimplexIdx};
use crate::{error::EmbeddingError, Dim, Result};

/// A container for the simplices of the same dimension that make up a mesh.
///
/// Vertex order of every simplex is preserved.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Skeleton {
  simplices: Vec<Simplex>,
  nvertices: usize,
}

impl Skeleton {
  /// All simplices must have the same dimension and distinct vertices.
  pub fn new(simplices: Vec<Simplex>) -> Result<Self> {
    let Some(first) = simplices.first() else {
      return Err(EmbeddingError::InvalidMesh("skeleton has no simplices".into()));
    };
    if let Some(isimp) = simplices.iter().position(|s| s.nvertices() == 0) {
      return Err(EmbeddingError::InvalidMesh(format!("simplex {isimp} has no vertices")));
    }
    let dim = first.dim();
    if let Some((isimp, simp)) = simplices.iter().enumerate().find(|(_, s)| s.dim() != dim) {
      return Err(EmbeddingError::InvalidMesh(format!(
        "simplex {isimp} has dimension {} but skeleton has dimension {dim}",
        simp.dim()
      )));
    }
    if let Some(isimp) = simplices.iter().position(|s| s.has_duplicate_vertices()) {
      return Err(EmbeddingError::InvalidMesh(format!(
        "simplex {isimp} has repeated vertices"
      )));
    }
    let nvertices = simplices
      .iter()
      .flat_map(|simp| simp.iter().copied())
      .max()
      .map_or(0, |v| v + 1);

    Ok(Self {
      simplices,
      nvertices,
    })
  }
  pub fn standard(dim: Dim) -> Self {
    Self {
      simplices: vec![Simplex::standard(dim)],
      nvertices: dim + 1,
    }
  }

  pub fn len(&self) -> usize {
    self.simplices.len()
  }
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
  pub fn dim(&self) -> Dim {
    self.simplices[0].dim()
  }
  /// One more than the largest referenced vertex.
  pub fn nvertices(&self) -> usize {
    self.nvertices
  }
  pub fn simplices(&self) -> &[Simplex] {
    &self.simplices
  }
  pub fn simplex(&self, idx: KSimplexIdx) -> &Simplex {
    &self.simplices[idx]
  }
  pub fn iter(&self) -> std::slice::Iter<'_, Simplex> {
    self.simplices.iter()
  }
  pub fn into_simplices(self) -> Vec<Simplex> {
    self.simplices
  }
}

impl IntoIterator for Skeleton {
  type Item = Simplex;
  type IntoIter = std::vec::IntoIter<Self::Item>;
  fn into_iter(self) -> Self::IntoIter {
    self.simplices.into_iter()
  }
}
