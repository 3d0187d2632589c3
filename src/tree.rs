//! Bounding volume hierarchy over the cells of a mesh, for point location.

use crate::{
  geometry::{
    aabb::Aabb,
    coord::{CoordRef, SimplexCoords},
  },
  mesh::SimplicialMesh,
  topology::CellIdx,
};

/// Number of cells up to which a node is not split any further.
const LEAF_SIZE: usize = 4;

#[derive(Debug, Clone)]
enum Node {
  Leaf { aabb: Aabb, cells: Vec<CellIdx> },
  Branch { aabb: Aabb, children: [usize; 2] },
}
impl Node {
  fn aabb(&self) -> &Aabb {
    match self {
      Node::Leaf { aabb, .. } | Node::Branch { aabb, .. } => aabb,
    }
  }
}

/// Answers which cells of a mesh contain a point.
///
/// Built once per mesh and never updated.
#[derive(Debug, Clone)]
pub struct BoundingBoxTree {
  nodes: Vec<Node>,
  root: usize,
  cells: Vec<SimplexCoords>,
  /// Barycentric slack of the containment test.
  eps: f64,
}

impl BoundingBoxTree {
  /// `collision_eps` is relative to the extent of the mesh.
  /// Points within that distance of a cell count as inside the cell.
  pub fn build(mesh: &SimplicialMesh, collision_eps: f64) -> Self {
    let pad = collision_eps * mesh.bounding_box().max_extent();
    let cells: Vec<SimplexCoords> = (0..mesh.ncells()).map(|icell| mesh.cell_coords(icell)).collect();
    let boxes: Vec<Aabb> = cells
      .iter()
      .map(|cell| cell.bounding_box().padded(pad))
      .collect();

    let mut tree = Self {
      nodes: Vec::with_capacity(2 * cells.len() / LEAF_SIZE + 1),
      root: 0,
      cells,
      eps: collision_eps,
    };
    let mut icells: Vec<CellIdx> = (0..boxes.len()).collect();
    tree.root = tree.build_node(&boxes, &mut icells);
    tree
  }

  /// Splits at the median of the box centers along the longest axis.
  fn build_node(&mut self, boxes: &[Aabb], icells: &mut [CellIdx]) -> usize {
    let dim = boxes[0].dim();
    let aabb = icells
      .iter()
      .fold(Aabb::empty(dim), |acc, &icell| acc.union(&boxes[icell]));

    let node = if icells.len() <= LEAF_SIZE {
      Node::Leaf {
        aabb,
        cells: icells.to_vec(),
      }
    } else {
      let mut centers = Aabb::empty(dim);
      for &icell in icells.iter() {
        centers.insert(boxes[icell].center().as_view());
      }
      let axis = centers.longest_axis();
      let mid = icells.len() / 2;
      icells.select_nth_unstable_by(mid, |&a, &b| {
        boxes[a].center()[axis].total_cmp(&boxes[b].center()[axis])
      });
      let (lower, upper) = icells.split_at_mut(mid);
      let children = [self.build_node(boxes, lower), self.build_node(boxes, upper)];
      Node::Branch { aabb, children }
    };
    self.nodes.push(node);
    self.nodes.len() - 1
  }

  pub fn ncells(&self) -> usize {
    self.cells.len()
  }

  /// All cells containing the point, in increasing order.
  pub fn compute_entity_collisions(&self, point: CoordRef) -> Vec<CellIdx> {
    let mut collisions = Vec::new();
    let mut stack = vec![self.root];
    while let Some(inode) = stack.pop() {
      let node = &self.nodes[inode];
      if !node.aabb().contains_point(point) {
        continue;
      }
      match node {
        Node::Leaf { cells, .. } => collisions.extend(
          cells
            .iter()
            .copied()
            .filter(|&icell| self.cells[icell].is_global_inside(point, self.eps)),
        ),
        Node::Branch { children, .. } => stack.extend(children),
      }
    }
    collisions.sort_unstable();
    collisions
  }

  /// The lowest numbered cell containing the point.
  pub fn compute_first_entity_collision(&self, point: CoordRef) -> Option<CellIdx> {
    self.compute_entity_collisions(point).first().copied()
  }
}
