//! A mesh plays the role of a container of mesh entities (in 3D: cells, faces, edges, vertices).
//! It provides a global numbering for unique identification of the entities.
//! It provides topology information (incidence) and stores the mesh geometry
//! (vertex coordinates).
//!
//! Meshes are immutable once constructed.

pub mod gen;

use crate::{
  error::EmbeddingError,
  geometry::{
    aabb::Aabb,
    coord::{Coord, MeshCoords, SimplexCoords},
  },
  topology::{
    complex::Complex, simplex::Simplex, skeleton::Skeleton, CellIdx, KSimplexIdx, VertexIdx,
  },
  Dim, Result,
};

use itertools::Itertools;
use once_cell::sync::OnceCell;
use std::{
  collections::BTreeSet,
  fmt,
  sync::atomic::{AtomicU64, Ordering},
};

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a mesh.
///
/// Clones share the identity of the mesh they were cloned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);
impl MeshId {
  fn fresh() -> Self {
    Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
  }
}
impl fmt::Display for MeshId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "mesh#{}", self.0)
  }
}

/// How a mesh is distributed over processes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Partitioning {
  #[default]
  Serial,
  /// This process holds one out of `nparts` pieces of the mesh.
  Distributed { nparts: usize },
}
impl Partitioning {
  pub fn nparts(&self) -> usize {
    match self {
      Self::Serial => 1,
      Self::Distributed { nparts } => *nparts,
    }
  }
  pub fn ensure_serial(&self) -> Result<()> {
    match self.nparts() {
      1 => Ok(()),
      nparts => Err(EmbeddingError::UnsupportedPartitioning { nparts }),
    }
  }
}

/// A simplicial mesh with both topological and geometric information.
#[derive(Debug, Clone)]
pub struct SimplicialMesh {
  id: MeshId,
  cells: Skeleton,
  coords: MeshCoords,
  partitioning: Partitioning,
  /// All entities, computed on first use.
  complex: OnceCell<Complex>,
}

// constructors
impl SimplicialMesh {
  pub fn new(cells: Vec<Simplex>, coords: MeshCoords) -> Result<Self> {
    let cells = Skeleton::new(cells)?;
    if cells.nvertices() > coords.nvertices() {
      return Err(EmbeddingError::InvalidMesh(format!(
        "cells reference vertex {} but there are only {} vertices",
        cells.nvertices() - 1,
        coords.nvertices()
      )));
    }
    if cells.dim() > coords.dim() {
      return Err(EmbeddingError::DimensionMismatch {
        expected: coords.dim(),
        found: cells.dim(),
        context: "topological dimension exceeds geometric dimension",
      });
    }
    Ok(Self {
      id: MeshId::fresh(),
      cells,
      coords,
      partitioning: Partitioning::Serial,
      complex: OnceCell::new(),
    })
  }

  /// From flat arrays: `coords` holds `dim_ambient` values per vertex and
  /// `cells` holds `dim_intrinsic + 1` vertex indices per cell.
  pub fn from_arrays(
    dim_ambient: Dim,
    coords: &[f64],
    dim_intrinsic: Dim,
    cells: &[VertexIdx],
  ) -> Result<Self> {
    let nvertices_cell = dim_intrinsic + 1;
    if dim_ambient == 0 || coords.len() % dim_ambient != 0 {
      return Err(EmbeddingError::InvalidMesh(format!(
        "{} coordinate values do not split into vertices of dimension {dim_ambient}",
        coords.len()
      )));
    }
    if cells.len() % nvertices_cell != 0 {
      return Err(EmbeddingError::InvalidMesh(format!(
        "{} connectivity entries do not split into cells of {nvertices_cell} vertices",
        cells.len()
      )));
    }
    let cells = cells
      .chunks_exact(nvertices_cell)
      .map(|c| Simplex::new(c.to_vec()))
      .collect();
    Self::new(cells, MeshCoords::from_row_major(dim_ambient, coords))
  }

  pub fn with_partitioning(mut self, partitioning: Partitioning) -> Self {
    self.partitioning = partitioning;
    self
  }
}

// getters
impl SimplicialMesh {
  pub fn id(&self) -> MeshId {
    self.id
  }
  pub fn partitioning(&self) -> Partitioning {
    self.partitioning
  }

  /// The topological dimension.
  pub fn dim_intrinsic(&self) -> Dim {
    self.cells.dim()
  }
  /// The geometric dimension.
  pub fn dim_ambient(&self) -> Dim {
    self.coords.dim()
  }
  /// Manifold meshes have lower topological than geometric dimension.
  pub fn is_immersed(&self) -> bool {
    self.dim_intrinsic() < self.dim_ambient()
  }

  pub fn nvertices(&self) -> usize {
    self.coords.nvertices()
  }
  pub fn ncells(&self) -> usize {
    self.cells.len()
  }
  pub fn cells(&self) -> &[Simplex] {
    self.cells.simplices()
  }
  pub fn cell(&self, icell: CellIdx) -> &Simplex {
    self.cells.simplex(icell)
  }
  pub fn coords(&self) -> &MeshCoords {
    &self.coords
  }

  pub fn complex(&self) -> &Complex {
    self
      .complex
      .get_or_init(|| Complex::from_cells(&self.cells, self.nvertices()))
  }
  pub fn nentities(&self, dim: Dim) -> usize {
    if dim == 0 {
      self.nvertices()
    } else if dim == self.dim_intrinsic() {
      self.ncells()
    } else {
      self.complex().nsimplicies(dim)
    }
  }
}

// geometry
impl SimplicialMesh {
  pub fn cell_coords(&self, icell: CellIdx) -> SimplexCoords {
    SimplexCoords::from_simplex_and_coords(self.cell(icell), &self.coords)
  }
  pub fn entity_coords(&self, dim: Dim, kidx: KSimplexIdx) -> SimplexCoords {
    if dim == self.dim_intrinsic() {
      return self.cell_coords(kidx);
    }
    SimplexCoords::from_simplex_and_coords(self.complex().simplex(dim, kidx), &self.coords)
  }

  pub fn cell_volume(&self, icell: CellIdx) -> f64 {
    self.cell_coords(icell).vol()
  }
  pub fn cell_midpoint(&self, icell: CellIdx) -> Coord {
    self.cell_coords(icell).barycenter()
  }
  pub fn entity_midpoint(&self, dim: Dim, kidx: KSimplexIdx) -> Coord {
    self.entity_coords(dim, kidx).barycenter()
  }
  pub fn volume(&self) -> f64 {
    (0..self.ncells()).map(|icell| self.cell_volume(icell)).sum()
  }

  pub fn bounding_box(&self) -> Aabb {
    self.coords.bounding_box()
  }
}

/// The mesh induced by a subset of cells, with its origin in the parent mesh.
#[derive(Debug, Clone)]
pub struct Submesh {
  pub mesh: SimplicialMesh,
  /// Parent vertex of every submesh vertex, increasing.
  pub parent_vertices: Vec<VertexIdx>,
  /// Parent cell of every submesh cell, increasing.
  pub parent_cells: Vec<CellIdx>,
}

impl SimplicialMesh {
  /// The mesh consisting of the given cells and the vertices they reference.
  ///
  /// Cells and vertices keep their relative order, duplicates are ignored.
  pub fn submesh(&self, cells: impl IntoIterator<Item = CellIdx>) -> Result<Submesh> {
    let parent_cells: Vec<CellIdx> = cells.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
    if let Some(&icell) = parent_cells.iter().find(|&&c| c >= self.ncells()) {
      return Err(EmbeddingError::InvalidMesh(format!(
        "cell {icell} is out of range for mesh with {} cells",
        self.ncells()
      )));
    }

    let parent_vertices: Vec<VertexIdx> = parent_cells
      .iter()
      .flat_map(|&icell| self.cell(icell).iter().copied())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    let cells = parent_cells
      .iter()
      .map(|&icell| {
        let vertices = self
          .cell(icell)
          .iter()
          .map(|v| {
            parent_vertices
              .binary_search(v)
              .expect("vertex of selected cell is selected")
          })
          .collect_vec();
        Simplex::new(vertices)
      })
      .collect();

    let coords = self.coords.gather(&parent_vertices);
    let mesh = SimplicialMesh::new(cells, coords)?.with_partitioning(self.partitioning);
    Ok(Submesh {
      mesh,
      parent_vertices,
      parent_cells,
    })
  }
}
