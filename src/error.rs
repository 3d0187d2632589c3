use crate::Dim;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Everything that can go wrong when extracting or embedding meshes.
///
/// No operation of this crate returns partial results:
/// an error means nothing was constructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EmbeddingError {
  #[error("dimension mismatch ({context}): expected {expected}, found {found}")]
  DimensionMismatch {
    expected: Dim,
    found: Dim,
    context: &'static str,
  },

  #[error("mesh is distributed over {nparts} partitions, only serial meshes are supported")]
  UnsupportedPartitioning { nparts: usize },

  #[error("no markers given")]
  EmptyMarkerSet,

  /// No parent vertex coincides with the embedded vertex.
  /// This is how hanging (non-conforming) nodes show up.
  #[error("vertex {vertex} has no coincident parent vertex (relative error {error:e} >= {tol:e})")]
  CoincidenceToleranceExceeded { vertex: usize, error: f64, tol: f64 },

  #[error("cell {cell} matches {ncandidates} parent entities, expected exactly one")]
  AmbiguousEntityMatch { cell: usize, ncandidates: usize },

  #[error("entity map of dimension {dim} has no entry for index {index}")]
  UnresolvedMapEntry { dim: Dim, index: usize },

  #[error("entity map of dimension {dim} hits parent index {parent_index} more than once")]
  NonInjectiveMap { dim: Dim, parent_index: usize },

  #[error("invalid mesh: {0}")]
  InvalidMesh(String),

  #[error("invalid marking function: {0}")]
  InvalidMarkingFunction(String),

  #[error("cell {cell} is degenerate")]
  DegenerateCell { cell: usize },

  #[error("unsupported cell: {0}")]
  UnsupportedCell(String),
}
