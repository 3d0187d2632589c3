//! Recovering the correspondence of imported meshes with their parents.

use submanifold::{
  embedding::resolve::build_embedding_map,
  geometry::coord::MeshCoords,
  mesh::gen::CartesianMeshInfo,
  topology::simplex::Simplex,
  EmbeddedMesh, EmbeddingConfig, EmbeddingError, EntityMap, SimplicialMesh,
};

use std::collections::HashSet;

/// The same mesh with vertices and cells numbered backwards.
fn renumbered(mesh: &SimplicialMesh) -> SimplicialMesh {
  let nvertices = mesh.nvertices();
  let flip = |v: usize| nvertices - 1 - v;
  let cells = mesh
    .cells()
    .iter()
    .rev()
    .map(|cell| Simplex::new(cell.iter().rev().map(|&v| flip(v)).collect()))
    .collect();
  let vertices: Vec<usize> = (0..nvertices).map(flip).collect();
  SimplicialMesh::new(cells, mesh.coords().gather(&vertices)).unwrap()
}

fn check_map(emesh: &SimplicialMesh, parent: &SimplicialMesh, map: &EntityMap, tol: f64) {
  let scale = emesh.bounding_box().max_extent();
  assert_eq!(map.vertex_map().len(), emesh.nvertices());
  assert_eq!(map.entity_map().len(), emesh.ncells());

  for (ivertex, &pvertex) in map.vertex_map().iter().enumerate() {
    let dist = (parent.coords().coord(pvertex) - emesh.coords().coord(ivertex)).norm();
    assert!(dist / scale < tol);
  }
  for (icell, &kidx) in map.entity_map().iter().enumerate() {
    let dist = (parent.entity_midpoint(map.dim(), kidx) - emesh.cell_midpoint(icell)).norm();
    assert!(dist / scale < 1e-12);
  }

  let vertices: HashSet<_> = map.vertex_map().iter().collect();
  let entities: HashSet<_> = map.entity_map().iter().collect();
  assert_eq!(vertices.len(), map.vertex_map().len());
  assert_eq!(entities.len(), map.entity_map().len());
}

#[test]
fn square_boundary() {
  let parent = CartesianMeshInfo::new_unit(2, 8).compute_mesh().unwrap();
  let boundary = EmbeddedMesh::boundary(&parent).unwrap();
  let imported = EmbeddedMesh::import(renumbered(&boundary)).unwrap();

  let config = EmbeddingConfig::default();
  let map = imported.embedding_map(&parent, &config).unwrap();
  check_map(&imported, &parent, &map, config.tol);
  assert_eq!(map.dim(), 1);

  let boundary_facets: HashSet<_> = parent.complex().boundary_facets().into_iter().collect();
  let matched: HashSet<_> = map.entity_map().iter().copied().collect();
  assert_eq!(matched, boundary_facets);
}

#[test]
fn cube_boundary() {
  let parent = CartesianMeshInfo::new_unit(3, 3).compute_mesh().unwrap();
  let boundary = EmbeddedMesh::boundary(&parent).unwrap();
  let imported = renumbered(&boundary);

  let config = EmbeddingConfig::default();
  let map = build_embedding_map(&imported, &parent, &config).unwrap();
  check_map(&imported, &parent, &map, config.tol);
  assert_eq!(map.entity_map().len(), 6 * 9 * 2);
}

#[test]
fn interior_edges_of_cube() {
  // Edges of the cube mesh, searched for in the mesh itself.
  let parent = CartesianMeshInfo::new_unit(3, 2).compute_mesh().unwrap();
  let complex = parent.complex();
  let edges = (0..complex.nsimplicies(1))
    .map(|kidx| complex.simplex(1, kidx).clone())
    .collect();
  let edge_mesh = renumbered(&SimplicialMesh::new(edges, parent.coords().clone()).unwrap());

  let config = EmbeddingConfig::default();
  let map = build_embedding_map(&edge_mesh, &parent, &config).unwrap();
  check_map(&edge_mesh, &parent, &map, config.tol);
  assert_eq!(map.entity_map().len(), complex.nsimplicies(1));
}

#[test]
fn displaced_vertex_is_rejected() {
  let parent = CartesianMeshInfo::new_unit(2, 4).compute_mesh().unwrap();
  // The bottom edge of the square, with its midpoint shifted along the edge.
  #[rustfmt::skip]
  let coords = MeshCoords::from_row_major(2, &[
    0.0, 0.0,
    0.25, 0.0,
    0.5 + 1e-3, 0.0,
    0.75, 0.0,
    1.0, 0.0,
  ]);
  let cells = (0..4).map(|i| Simplex::from([i, i + 1])).collect();
  let emesh = SimplicialMesh::new(cells, coords).unwrap();

  let err = build_embedding_map(&emesh, &parent, &EmbeddingConfig::default()).unwrap_err();
  match err {
    EmbeddingError::CoincidenceToleranceExceeded { vertex, error, tol } => {
      assert_eq!(vertex, 2);
      assert!((error - 1e-3).abs() < 1e-12);
      assert_eq!(tol, 1e-14);
    }
    other => panic!("unexpected error: {other}"),
  }

  // A looser tolerance accepts the displacement.
  let config = EmbeddingConfig::default().with_tol(1e-2);
  let map = build_embedding_map(&emesh, &parent, &config).unwrap();
  assert_eq!(map.entity_map().len(), 4);
}

#[test]
fn hanging_node_is_rejected() {
  // The parent has no vertex at x = 0.25.
  let parent = CartesianMeshInfo::new_unit(2, 2).compute_mesh().unwrap();
  let emesh =
    SimplicialMesh::from_arrays(2, &[0.0, 0.0, 0.25, 0.0, 0.5, 0.0], 1, &[0, 1, 1, 2]).unwrap();
  assert!(matches!(
    build_embedding_map(&emesh, &parent, &EmbeddingConfig::default()),
    Err(EmbeddingError::CoincidenceToleranceExceeded { vertex: 1, .. })
  ));
}

#[test]
fn trusted_map_skips_search() {
  let parent = CartesianMeshInfo::new_unit(2, 4).compute_mesh().unwrap();
  let boundary = EmbeddedMesh::boundary(&parent).unwrap();
  let config = EmbeddingConfig::default();

  let trusted = boundary.embedding_map(&parent, &config).unwrap();
  assert_eq!(&trusted, boundary.parent_map(parent.id()).unwrap());

  // An equal but distinct parent is not trusted and gets searched.
  let twin = CartesianMeshInfo::new_unit(2, 4).compute_mesh().unwrap();
  assert_ne!(twin.id(), parent.id());
  assert!(!boundary.is_derived_from(&twin));
  let searched = boundary.embedding_map(&twin, &config).unwrap();
  assert_eq!(searched, trusted);
  assert!(boundary.parent_map(twin.id()).is_none());
}
