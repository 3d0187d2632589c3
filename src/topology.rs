//! Combinatorial structure of simplicial meshes.
//!
//! Entities of every dimension are numbered globally, which provides the
//! incidence relations cell -> vertex, cell -> entity and entity -> vertex.

pub mod complex;
pub mod simplex;
pub mod skeleton;

pub type VertexIdx = usize;
pub type CellIdx = usize;
/// Index of a simplex inside of its skeleton (the entities of one dimension).
pub type KSimplexIdx = usize;
