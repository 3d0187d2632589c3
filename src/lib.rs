//! Embedded (lower-dimensional) meshes of simplicial meshes.
//!
//! - Extraction of marked entities (facets, cells) of a parent mesh into a new mesh.
//! - Vertex and entity correspondence between an embedded mesh and its parent,
//!   either recorded during extraction or recovered by geometric search.
//! - Outward normals of manifold meshes.

extern crate nalgebra as na;

pub mod combo;
pub mod embedding;
pub mod error;
pub mod geometry;
pub mod marking;
pub mod mesh;
pub mod normal;
pub mod topology;
pub mod trace;
pub mod tree;

pub use embedding::{EmbeddedMesh, EmbeddingConfig, EntityMap, Provenance};
pub use error::{EmbeddingError, Result};
pub use marking::{Marker, MarkingFunction, SubDomain};
pub use mesh::{MeshId, Partitioning, SimplicialMesh};

pub type Dim = usize;
