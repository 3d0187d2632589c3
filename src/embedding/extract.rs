//! Building a mesh from the marked entities of a parent mesh.

use super::EntityMap;
use crate::{
  error::EmbeddingError,
  marking::MarkingFunction,
  mesh::SimplicialMesh,
  topology::{simplex::Simplex, CellIdx, KSimplexIdx, VertexIdx},
  Dim, Result,
};

use itertools::Itertools;
use std::{collections::HashMap, time::Instant};

/// The result of an extraction: the new mesh, the label of every new cell
/// and the map back to the parent.
#[derive(Debug, Clone)]
pub struct Extraction {
  pub mesh: SimplicialMesh,
  pub colors: Vec<usize>,
  pub map: EntityMap,
}

/// Extracts all entities of `f` whose label is one of `markers`.
///
/// Cells of the new mesh are ordered by marker, then by parent entity.
/// Vertices are numbered in the order they are first referenced.
pub fn extract(parent: &SimplicialMesh, f: &MarkingFunction, markers: &[usize]) -> Result<Extraction> {
  f.check_mesh(parent)?;
  parent.partitioning().ensure_serial()?;

  let dim = f.dim();
  if dim == 0 {
    return Err(EmbeddingError::DimensionMismatch {
      expected: 1,
      found: 0,
      context: "cannot extract a mesh of vertices",
    });
  }
  if dim > parent.dim_intrinsic() {
    return Err(EmbeddingError::DimensionMismatch {
      expected: parent.dim_intrinsic(),
      found: dim,
      context: "marking function dimension exceeds parent dimension",
    });
  }
  if markers.is_empty() {
    return Err(EmbeddingError::EmptyMarkerSet);
  }

  let markers = normalize_markers(markers);
  let _span = tracing::info_span!("extract", dim, parent = %parent.id()).entered();
  let timer = Instant::now();

  for &marker in &markers {
    if f.subset(marker).next().is_none() {
      tracing::warn!("marker {marker} labels no entity of dimension {dim}");
    }
  }

  let extraction = if dim == parent.dim_intrinsic() {
    tracing::debug!("extracting cells");
    extract_cells(parent, f, &markers)?
  } else {
    tracing::debug!("extracting entities of codimension {}", parent.dim_intrinsic() - dim);
    extract_entities(parent, f, &markers)?
  };

  tracing::info!(
    "extracted {} cells and {} vertices for markers {:?} in {:.2?}",
    extraction.mesh.ncells(),
    extraction.mesh.nvertices(),
    markers,
    timer.elapsed()
  );
  Ok(extraction)
}

/// Sorted and without duplicates.
fn normalize_markers(markers: &[usize]) -> Vec<usize> {
  let normalized = markers.iter().copied().sorted().dedup().collect_vec();
  if normalized.len() != markers.len() {
    tracing::warn!("ignoring duplicate markers in {markers:?}");
  }
  normalized
}

fn nothing_marked(dim: Dim, markers: &[usize]) -> EmbeddingError {
  EmbeddingError::InvalidMesh(format!(
    "no entity of dimension {dim} is labeled with any of {markers:?}"
  ))
}

/// The submesh induced by the marked cells.
fn extract_cells(
  parent: &SimplicialMesh,
  f: &MarkingFunction,
  markers: &[usize],
) -> Result<Extraction> {
  let dim = f.dim();
  let selected: Vec<CellIdx> = markers.iter().flat_map(|&marker| f.subset(marker)).collect();
  if selected.is_empty() {
    return Err(nothing_marked(dim, markers));
  }

  let submesh = parent.submesh(selected)?;
  let colors = match markers {
    [marker] => vec![*marker; submesh.parent_cells.len()],
    _ => submesh.parent_cells.iter().map(|&icell| f.get(icell)).collect(),
  };
  let map = EntityMap::try_new(dim, submesh.parent_vertices, submesh.parent_cells)?;
  Ok(Extraction {
    mesh: submesh.mesh,
    colors,
    map,
  })
}

/// A new mesh whose cells are the marked lower dimensional entities.
fn extract_entities(
  parent: &SimplicialMesh,
  f: &MarkingFunction,
  markers: &[usize],
) -> Result<Extraction> {
  let dim = f.dim();
  let complex = parent.complex();

  let mut new_vertices: HashMap<VertexIdx, VertexIdx> = HashMap::new();
  let mut parent_vertices: Vec<VertexIdx> = Vec::new();
  let mut parent_entities: Vec<KSimplexIdx> = Vec::new();
  let mut cells: Vec<Simplex> = Vec::new();
  let mut colors: Vec<usize> = Vec::new();

  for &marker in markers {
    for kidx in f.subset(marker) {
      let mut cell = Vec::with_capacity(dim + 1);
      for &vertex in complex.simplex(dim, kidx).iter() {
        let new_vertex = *new_vertices.entry(vertex).or_insert_with(|| {
          parent_vertices.push(vertex);
          parent_vertices.len() - 1
        });
        cell.push(new_vertex);
      }
      cells.push(Simplex::new(cell));
      parent_entities.push(kidx);
      colors.push(marker);
    }
  }
  if cells.is_empty() {
    return Err(nothing_marked(dim, markers));
  }

  let coords = parent.coords().gather(&parent_vertices);
  let mesh = SimplicialMesh::new(cells, coords)?.with_partitioning(parent.partitioning());
  let map = EntityMap::try_new(dim, parent_vertices, parent_entities)?;
  Ok(Extraction { mesh, colors, map })
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{mesh::gen::CartesianMeshInfo, mesh::Partitioning};

  use approx::assert_relative_eq;

  #[test]
  fn preconditions() {
    let parent = CartesianMeshInfo::new_unit(2, 2).compute_mesh().unwrap();
    let other = CartesianMeshInfo::new_unit(2, 2).compute_mesh().unwrap();

    let f = MarkingFunction::new(&parent, 1, 1).unwrap();
    assert!(matches!(
      extract(&other, &f, &[1]),
      Err(EmbeddingError::InvalidMarkingFunction(_))
    ));
    assert_eq!(extract(&parent, &f, &[]).unwrap_err(), EmbeddingError::EmptyMarkerSet);
    assert!(matches!(
      extract(&parent, &f, &[7]),
      Err(EmbeddingError::InvalidMesh(_))
    ));

    let f = MarkingFunction::new(&parent, 0, 1).unwrap();
    assert!(matches!(
      extract(&parent, &f, &[1]),
      Err(EmbeddingError::DimensionMismatch { .. })
    ));

    let distributed = parent.clone().with_partitioning(Partitioning::Distributed { nparts: 2 });
    let f = MarkingFunction::new(&distributed, 1, 1).unwrap();
    assert_eq!(
      extract(&distributed, &f, &[1]).unwrap_err(),
      EmbeddingError::UnsupportedPartitioning { nparts: 2 }
    );
  }

  #[test]
  fn vertices_are_shared() {
    // The two edges on the bottom of the unit square.
    let parent = CartesianMeshInfo::new_unit(2, 2).compute_mesh().unwrap();
    let complex = parent.complex();
    let bottom = [
      complex.kidx_by_simplex(&Simplex::from([0, 1])).unwrap(),
      complex.kidx_by_simplex(&Simplex::from([1, 2])).unwrap(),
    ];
    let mut f = MarkingFunction::new(&parent, 1, 0).unwrap();
    for kidx in bottom {
      f.set(kidx, 3);
    }

    let extraction = extract(&parent, &f, &[3, 3]).unwrap();
    assert_eq!(extraction.mesh.nvertices(), 3);
    assert_eq!(extraction.map.vertex_map(), &[0, 1, 2]);
    assert_eq!(extraction.map.entity_map(), &bottom.iter().copied().sorted().collect_vec()[..]);
    assert_eq!(extraction.colors, vec![3, 3]);
    assert_relative_eq!(extraction.mesh.volume(), 1.0);
    assert_eq!(extraction.mesh.dim_ambient(), 2);
  }

  #[test]
  fn cells_keep_their_labels() {
    let parent = CartesianMeshInfo::new_unit(2, 2).compute_mesh().unwrap();
    let values = (0..parent.ncells()).map(|icell| icell % 3).collect();
    let f = MarkingFunction::from_values(&parent, 2, values).unwrap();

    let extraction = extract(&parent, &f, &[2, 1]).unwrap();
    assert_eq!(extraction.map.entity_map(), &[1, 2, 4, 5, 7]);
    assert_eq!(extraction.colors, vec![1, 2, 1, 2, 1]);
    for (icell, &pcell) in extraction.map.entity_map().iter().enumerate() {
      assert_relative_eq!(extraction.mesh.cell_volume(icell), parent.cell_volume(pcell));
    }
  }
}
