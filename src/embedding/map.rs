use crate::{
  error::EmbeddingError,
  topology::{CellIdx, KSimplexIdx, VertexIdx},
  Dim, Result,
};

use std::collections::HashMap;

/// Correspondence of an embedded mesh with its parent mesh.
///
/// `vertices[v]` is the parent vertex of embedded vertex `v`,
/// `entities[c]` is the parent entity of dimension `dim` of embedded cell `c`.
/// Both are injective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMap {
  dim: Dim,
  vertices: Vec<VertexIdx>,
  entities: Vec<KSimplexIdx>,
}

impl EntityMap {
  pub fn try_new(dim: Dim, vertices: Vec<VertexIdx>, entities: Vec<KSimplexIdx>) -> Result<Self> {
    check_injective(0, &vertices)?;
    check_injective(dim, &entities)?;
    Ok(Self {
      dim,
      vertices,
      entities,
    })
  }

  /// From maps built up incrementally. Every slot must be filled.
  pub fn from_partial(
    dim: Dim,
    vertices: Vec<Option<VertexIdx>>,
    entities: Vec<Option<KSimplexIdx>>,
  ) -> Result<Self> {
    let vertices = unwrap_all(0, vertices)?;
    let entities = unwrap_all(dim, entities)?;
    Self::try_new(dim, vertices, entities)
  }

  /// The dimension of the embedded cells and of their parent entities.
  pub fn dim(&self) -> Dim {
    self.dim
  }
  pub fn vertex_map(&self) -> &[VertexIdx] {
    &self.vertices
  }
  pub fn entity_map(&self) -> &[KSimplexIdx] {
    &self.entities
  }
  /// The map of entities of dimension `dim`, if present.
  pub fn get(&self, dim: Dim) -> Option<&[usize]> {
    if dim == 0 {
      Some(&self.vertices)
    } else if dim == self.dim {
      Some(&self.entities)
    } else {
      None
    }
  }

  pub fn parent_vertex(&self, ivertex: VertexIdx) -> VertexIdx {
    self.vertices[ivertex]
  }
  pub fn parent_entity(&self, icell: CellIdx) -> KSimplexIdx {
    self.entities[icell]
  }

  /// Parent vertex to embedded vertex.
  pub fn inverse_vertex_map(&self) -> HashMap<VertexIdx, VertexIdx> {
    invert(&self.vertices)
  }
  /// Parent entity to embedded cell.
  pub fn inverse_entity_map(&self) -> HashMap<KSimplexIdx, CellIdx> {
    invert(&self.entities)
  }
}

fn check_injective(dim: Dim, map: &[usize]) -> Result<()> {
  let mut seen = vec![false; map.iter().max().map_or(0, |&m| m + 1)];
  for &parent_index in map {
    if std::mem::replace(&mut seen[parent_index], true) {
      return Err(EmbeddingError::NonInjectiveMap { dim, parent_index });
    }
  }
  Ok(())
}

fn unwrap_all(dim: Dim, map: Vec<Option<usize>>) -> Result<Vec<usize>> {
  map
    .into_iter()
    .enumerate()
    .map(|(index, entry)| entry.ok_or(EmbeddingError::UnresolvedMapEntry { dim, index }))
    .collect()
}

fn invert(map: &[usize]) -> HashMap<usize, usize> {
  map.iter().enumerate().map(|(i, &parent)| (parent, i)).collect()
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn injectivity() {
    assert!(EntityMap::try_new(1, vec![4, 2, 7], vec![0, 9]).is_ok());
    assert_eq!(
      EntityMap::try_new(1, vec![4, 2, 4], vec![0, 9]),
      Err(EmbeddingError::NonInjectiveMap {
        dim: 0,
        parent_index: 4
      })
    );
    assert_eq!(
      EntityMap::try_new(2, vec![0, 1, 2], vec![3, 3]),
      Err(EmbeddingError::NonInjectiveMap {
        dim: 2,
        parent_index: 3
      })
    );
  }

  #[test]
  fn unresolved_entries() {
    assert_eq!(
      EntityMap::from_partial(1, vec![Some(0), Some(1)], vec![Some(5), None]),
      Err(EmbeddingError::UnresolvedMapEntry { dim: 1, index: 1 })
    );
  }

  #[test]
  fn lookup_and_inverse() {
    let map = EntityMap::try_new(2, vec![10, 3, 6], vec![8]).unwrap();
    assert_eq!(map.get(0), Some(&[10, 3, 6][..]));
    assert_eq!(map.get(2), Some(&[8][..]));
    assert_eq!(map.get(1), None);
    assert_eq!(map.parent_vertex(1), 3);
    assert_eq!(map.inverse_vertex_map()[&6], 2);
    assert_eq!(map.inverse_entity_map()[&8], 0);
  }
}
