//! Normals of boundary meshes.

use submanifold::{
  geometry::coord::Coord,
  mesh::gen::CartesianMeshInfo,
  normal::{inner_normal, outer_normal, Orientation},
  EmbeddedMesh,
};

use approx::assert_relative_eq;
use std::collections::HashSet;

#[test]
fn cube_boundary_normals() {
  let parent = CartesianMeshInfo::new_unit(3, 2).compute_mesh().unwrap();
  let boundary = EmbeddedMesh::boundary(&parent).unwrap();
  let centroid = Coord::from_element(3, 0.5);
  let normals = outer_normal(&boundary, &Orientation::away_from(centroid)).unwrap();
  assert_eq!(normals.ncells(), boundary.ncells());
  assert_eq!(normals.dim(), 3);

  let mut faces = HashSet::new();
  for icell in 0..boundary.ncells() {
    let midpoint = boundary.cell_midpoint(icell);
    let cell = boundary.cell_coords(icell);
    // The axis along which the face is flat.
    let axis = (0..3)
      .find(|&i| cell.vertices.coord_iter().all(|v| v[i] == cell.coord(0)[i]))
      .unwrap();
    let side = if midpoint[axis] > 0.5 { 1.0 } else { -1.0 };
    let mut expected = Coord::zeros(3);
    expected[axis] = side;
    assert_relative_eq!(normals.cell_value(icell).into_owned(), expected, epsilon = 1e-10);
    faces.insert((axis, side > 0.0));
  }
  assert_eq!(faces.len(), 6);
}

#[test]
fn square_boundary_inner_normals() {
  let parent = CartesianMeshInfo::new_unit(2, 3).compute_mesh().unwrap();
  let boundary = EmbeddedMesh::boundary(&parent).unwrap();
  let centroid = Coord::from_element(2, 0.5);
  let normals = inner_normal(&boundary, &Orientation::away_from(centroid.clone())).unwrap();
  for icell in 0..boundary.ncells() {
    let towards_center = &centroid - boundary.cell_midpoint(icell);
    let n = normals.cell_value(icell);
    assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
    assert!(n.dot(&towards_center) > 0.0);
  }
}
