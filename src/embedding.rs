//! Meshes made of entities of another (parent) mesh.
//!
//! An [`EmbeddedMesh`] either comes out of extracting marked entities of its parent,
//! in which case the correspondence with the parent is known from the construction,
//! or is imported from elsewhere, in which case the correspondence is recovered
//! by geometric search.

pub mod extract;
pub mod map;
pub mod resolve;

pub use map::EntityMap;

use crate::{
  error::EmbeddingError,
  marking::{resolve_markers, Marker, MarkingFunction},
  mesh::{MeshId, SimplicialMesh},
  Result,
};

use std::{collections::HashMap, ops::Deref};

/// Tolerances of the geometric search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingConfig {
  /// Maximal distance of coincident vertices, relative to the extent of the embedded mesh.
  pub tol: f64,
  /// Slack of the point in cell test, relative to the extent of the parent mesh.
  pub collision_eps: f64,
}
impl Default for EmbeddingConfig {
  fn default() -> Self {
    Self {
      tol: 1e-14,
      collision_eps: 1e-10,
    }
  }
}
impl EmbeddingConfig {
  pub fn with_tol(mut self, tol: f64) -> Self {
    self.tol = tol;
    self
  }
  pub fn with_collision_eps(mut self, collision_eps: f64) -> Self {
    self.collision_eps = collision_eps;
    self
  }
}

/// Where an embedded mesh comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
  /// Extracted from the entities of `parent`. The map to `parent` is trusted.
  Extracted { parent: MeshId },
  /// Constructed elsewhere. Maps have to be searched for.
  Imported,
}

/// A mesh together with its labels and its correspondence to parent meshes.
#[derive(Debug, Clone)]
pub struct EmbeddedMesh {
  mesh: SimplicialMesh,
  marking_function: MarkingFunction,
  provenance: Provenance,
  parent_maps: HashMap<MeshId, EntityMap>,
}

// constructors
impl EmbeddedMesh {
  /// The mesh of all entities of `f` labeled with one of `markers`.
  ///
  /// The cells inherit the labels of their parent entities.
  pub fn from_marking(parent: &SimplicialMesh, f: &MarkingFunction, markers: &[usize]) -> Result<Self> {
    let extraction = extract::extract(parent, f, markers)?;
    let mesh = extraction.mesh;
    let marking_function =
      MarkingFunction::from_values(&mesh, mesh.dim_intrinsic(), extraction.colors)?;
    let parent_maps = HashMap::from([(parent.id(), extraction.map)]);
    Ok(Self {
      mesh,
      marking_function,
      provenance: Provenance::Extracted {
        parent: parent.id(),
      },
      parent_maps,
    })
  }

  /// Like [`EmbeddedMesh::from_marking`], but regions are first painted
  /// into `f` with fresh labels.
  pub fn from_markers(
    parent: &SimplicialMesh,
    f: &mut MarkingFunction,
    markers: Vec<Marker>,
  ) -> Result<Self> {
    if markers.is_empty() {
      return Err(EmbeddingError::EmptyMarkerSet);
    }
    let labels = resolve_markers(f, parent, markers)?;
    Self::from_marking(parent, f, &labels)
  }

  /// The facets of `parent` lying on its boundary, labeled 1.
  pub fn boundary(parent: &SimplicialMesh) -> Result<Self> {
    let dim = parent.dim_intrinsic();
    if dim < 2 {
      return Err(EmbeddingError::DimensionMismatch {
        expected: 2,
        found: dim,
        context: "boundary mesh needs cells of dimension at least 2",
      });
    }
    let mut f = MarkingFunction::new(parent, dim - 1, 0)?;
    for facet in parent.complex().boundary_facets() {
      f.set(facet, 1);
    }
    Self::from_marking(parent, &f, &[1])
  }

  /// A mesh with no known parent. All cells are labeled 0.
  pub fn import(mesh: SimplicialMesh) -> Result<Self> {
    let marking_function = MarkingFunction::new(&mesh, mesh.dim_intrinsic(), 0)?;
    Ok(Self {
      mesh,
      marking_function,
      provenance: Provenance::Imported,
      parent_maps: HashMap::new(),
    })
  }
}

impl EmbeddedMesh {
  pub fn mesh(&self) -> &SimplicialMesh {
    &self.mesh
  }
  pub fn into_mesh(self) -> SimplicialMesh {
    self.mesh
  }
  pub fn marking_function(&self) -> &MarkingFunction {
    &self.marking_function
  }
  pub fn provenance(&self) -> Provenance {
    self.provenance
  }
  pub fn is_derived_from(&self, parent: &SimplicialMesh) -> bool {
    self.provenance
      == Provenance::Extracted {
        parent: parent.id(),
      }
  }
  /// The stored map to the mesh with identity `parent`, if any.
  pub fn parent_map(&self, parent: MeshId) -> Option<&EntityMap> {
    self.parent_maps.get(&parent)
  }

  /// The correspondence with `parent`.
  ///
  /// Stored maps are returned as they are, otherwise the map is searched for.
  pub fn embedding_map(&self, parent: &SimplicialMesh, config: &EmbeddingConfig) -> Result<EntityMap> {
    if let Some(map) = self.parent_maps.get(&parent.id()) {
      tracing::debug!("using stored map to {}", parent.id());
      return Ok(map.clone());
    }
    resolve::build_embedding_map(&self.mesh, parent, config)
  }

  /// Like [`EmbeddedMesh::embedding_map`], but a searched map is stored for reuse.
  pub fn entity_map_for(
    &mut self,
    parent: &SimplicialMesh,
    config: &EmbeddingConfig,
  ) -> Result<&EntityMap> {
    let key = parent.id();
    if !self.parent_maps.contains_key(&key) {
      let map = resolve::build_embedding_map(&self.mesh, parent, config)?;
      self.parent_maps.insert(key, map);
    }
    Ok(&self.parent_maps[&key])
  }
}

impl Deref for EmbeddedMesh {
  type Target = SimplicialMesh;
  fn deref(&self) -> &Self::Target {
    &self.mesh
  }
}
