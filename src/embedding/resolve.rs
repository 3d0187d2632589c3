//! Recovering the correspondence of an embedded mesh with a parent mesh
//! from coordinates alone.

use super::{EmbeddingConfig, EntityMap};
use crate::{
  error::EmbeddingError,
  geometry::coord::CoordRef,
  mesh::SimplicialMesh,
  topology::{complex::Complex, KSimplexIdx, VertexIdx},
  tree::BoundingBoxTree,
  Dim, Result,
};

use std::{collections::BTreeSet, time::Instant};

/// Finds for every vertex of `emesh` the coincident vertex of `parent`
/// and for every cell of `emesh` the parent entity with the same vertices.
///
/// Fails if some vertex has no parent vertex within the tolerance
/// (e.g. hanging nodes) or if a cell does not match exactly one parent entity.
pub fn build_embedding_map(
  emesh: &SimplicialMesh,
  parent: &SimplicialMesh,
  config: &EmbeddingConfig,
) -> Result<EntityMap> {
  emesh.partitioning().ensure_serial()?;
  parent.partitioning().ensure_serial()?;

  let dim = emesh.dim_intrinsic();
  if dim >= parent.dim_intrinsic() {
    return Err(EmbeddingError::DimensionMismatch {
      expected: parent.dim_intrinsic().saturating_sub(1),
      found: dim,
      context: "embedded mesh must have lower dimension than its parent",
    });
  }
  if emesh.dim_ambient() != parent.dim_ambient() {
    return Err(EmbeddingError::DimensionMismatch {
      expected: parent.dim_ambient(),
      found: emesh.dim_ambient(),
      context: "embedded and parent mesh live in different spaces",
    });
  }

  let _span = tracing::info_span!("resolve", dim, parent = %parent.id()).entered();
  let timer = Instant::now();

  let complex = parent.complex();
  let tree = BoundingBoxTree::build(parent, config.collision_eps);
  let scale = match emesh.bounding_box().max_extent() {
    extent if extent > 0.0 => extent,
    _ => 1.0,
  };
  let locator = VertexLocator {
    parent,
    complex,
    tree: &tree,
    dim,
    scale,
    tol: config.tol,
  };

  let mut vertex_map: Vec<Option<VertexIdx>> = vec![None; emesh.nvertices()];
  // Candidate parent entities of every resolved vertex.
  let mut vertex_entities: Vec<Option<BTreeSet<KSimplexIdx>>> = vec![None; emesh.nvertices()];
  let mut entity_map: Vec<Option<KSimplexIdx>> = vec![None; emesh.ncells()];

  for (icell, cell) in emesh.cells().iter().enumerate() {
    for &ivertex in cell.iter() {
      if vertex_map[ivertex].is_none() {
        let (pvertex, entities) = locator.locate(ivertex, emesh.coords().coord(ivertex))?;
        vertex_map[ivertex] = Some(pvertex);
        vertex_entities[ivertex] = Some(entities);
      }
    }

    let mut candidates = cell.iter().filter_map(|&ivertex| vertex_entities[ivertex].as_ref());
    let first = candidates.next().cloned().unwrap_or_default();
    let common = candidates.fold(first, |common, entities| &common & entities);
    match common.len() {
      1 => entity_map[icell] = common.first().copied(),
      ncandidates => return Err(EmbeddingError::AmbiguousEntityMatch { cell: icell, ncandidates }),
    }
  }

  let map = EntityMap::from_partial(dim, vertex_map, entity_map)?;
  tracing::info!(
    "resolved {} vertices and {} cells in {:.2?}",
    emesh.nvertices(),
    emesh.ncells(),
    timer.elapsed()
  );
  Ok(map)
}

struct VertexLocator<'a> {
  parent: &'a SimplicialMesh,
  complex: &'a Complex,
  tree: &'a BoundingBoxTree,
  /// Dimension of the parent entities to match.
  dim: Dim,
  scale: f64,
  tol: f64,
}

impl VertexLocator<'_> {
  /// The parent vertex coinciding with `x` and the parent entities containing it.
  fn locate(&self, ivertex: VertexIdx, x: CoordRef) -> Result<(VertexIdx, BTreeSet<KSimplexIdx>)> {
    let cells = self.tree.compute_entity_collisions(x);

    let nearest = cells.first().and_then(|&icell| {
      self
        .parent
        .cell(icell)
        .iter()
        .map(|&pvertex| (pvertex, (self.parent.coords().coord(pvertex) - x).norm()))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
    });
    let (pvertex, error) = match nearest {
      Some((pvertex, dist)) => (pvertex, dist / self.scale),
      None => (0, f64::INFINITY),
    };
    if !(error < self.tol) {
      return Err(EmbeddingError::CoincidenceToleranceExceeded {
        vertex: ivertex,
        error,
        tol: self.tol,
      });
    }

    // The cells around the parent vertex. For coincident points these are
    // exactly the colliding cells.
    let entities = self
      .complex
      .cocells(0, pvertex)
      .iter()
      .flat_map(|&icell| self.complex.cell_subs(self.dim, icell).iter().copied())
      .filter(|&kidx| self.complex.simplex(self.dim, kidx).has_vertex(pvertex))
      .collect();
    Ok((pvertex, entities))
  }
}
