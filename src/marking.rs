//! Labels on the entities of one dimension of a mesh.

use crate::{
  error::EmbeddingError,
  geometry::coord::CoordRef,
  mesh::{MeshId, SimplicialMesh},
  topology::KSimplexIdx,
  Dim, Result,
};

use itertools::Itertools;
use std::fmt;

/// A non-negative integer label for every entity of dimension `dim` of a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkingFunction {
  mesh: MeshId,
  dim: Dim,
  values: Vec<usize>,
}

impl MarkingFunction {
  /// Every entity of dimension `dim` labeled with `default`.
  pub fn new(mesh: &SimplicialMesh, dim: Dim, default: usize) -> Result<Self> {
    check_dim(mesh, dim)?;
    Ok(Self {
      mesh: mesh.id(),
      dim,
      values: vec![default; mesh.nentities(dim)],
    })
  }
  pub fn from_values(mesh: &SimplicialMesh, dim: Dim, values: Vec<usize>) -> Result<Self> {
    check_dim(mesh, dim)?;
    let nentities = mesh.nentities(dim);
    if values.len() != nentities {
      return Err(EmbeddingError::InvalidMarkingFunction(format!(
        "{} values given for {nentities} entities of dimension {dim}",
        values.len()
      )));
    }
    Ok(Self {
      mesh: mesh.id(),
      dim,
      values,
    })
  }

  pub fn mesh_id(&self) -> MeshId {
    self.mesh
  }
  pub fn dim(&self) -> Dim {
    self.dim
  }
  pub fn len(&self) -> usize {
    self.values.len()
  }
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
  pub fn values(&self) -> &[usize] {
    &self.values
  }
  pub fn values_mut(&mut self) -> &mut [usize] {
    &mut self.values
  }
  pub fn get(&self, kidx: KSimplexIdx) -> usize {
    self.values[kidx]
  }
  pub fn set(&mut self, kidx: KSimplexIdx, value: usize) {
    self.values[kidx] = value;
  }
  pub fn set_all(&mut self, value: usize) {
    self.values.fill(value);
  }

  /// The entities labeled `marker`, in increasing order.
  pub fn subset(&self, marker: usize) -> impl Iterator<Item = KSimplexIdx> + '_ {
    self
      .values
      .iter()
      .enumerate()
      .filter(move |(_, &value)| value == marker)
      .map(|(kidx, _)| kidx)
  }
  /// The distinct labels in use, sorted.
  pub fn markers(&self) -> Vec<usize> {
    self.values.iter().copied().sorted().dedup().collect()
  }

  pub fn check_mesh(&self, mesh: &SimplicialMesh) -> Result<()> {
    if self.mesh != mesh.id() {
      return Err(EmbeddingError::InvalidMarkingFunction(format!(
        "marking function belongs to {}, not to {}",
        self.mesh,
        mesh.id()
      )));
    }
    Ok(())
  }
}

fn check_dim(mesh: &SimplicialMesh, dim: Dim) -> Result<()> {
  if dim > mesh.dim_intrinsic() {
    return Err(EmbeddingError::DimensionMismatch {
      expected: mesh.dim_intrinsic(),
      found: dim,
      context: "marking function dimension exceeds mesh dimension",
    });
  }
  Ok(())
}

/// A region of space, given by a point membership predicate.
pub trait SubDomain {
  fn inside(&self, x: CoordRef) -> bool;

  /// Labels every entity of the marking function's dimension that lies in the region.
  ///
  /// An entity lies in the region if its midpoint and all its vertices do.
  /// Returns the number of labeled entities.
  fn mark(&self, f: &mut MarkingFunction, mesh: &SimplicialMesh, value: usize) -> Result<usize> {
    f.check_mesh(mesh)?;
    let dim = f.dim();
    let mut nmarked = 0;
    for kidx in 0..f.len() {
      let entity = mesh.entity_coords(dim, kidx);
      let midpoint = entity.barycenter();
      if self.inside(midpoint.as_view()) && entity.vertices.coord_iter().all(|v| self.inside(v)) {
        f.set(kidx, value);
        nmarked += 1;
      }
    }
    Ok(nmarked)
  }
}

impl<F> SubDomain for F
where
  F: Fn(CoordRef) -> bool,
{
  fn inside(&self, x: CoordRef) -> bool {
    self(x)
  }
}

/// Which entities to extract: an existing label or a region still to be labeled.
pub enum Marker {
  Label(usize),
  Region(Box<dyn SubDomain>),
}

impl Marker {
  pub fn region(subdomain: impl SubDomain + 'static) -> Self {
    Self::Region(Box::new(subdomain))
  }
}

impl From<usize> for Marker {
  fn from(label: usize) -> Self {
    Self::Label(label)
  }
}

impl fmt::Debug for Marker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Label(label) => f.debug_tuple("Label").field(label).finish(),
      Self::Region(_) => f.write_str("Region(..)"),
    }
  }
}

/// Turns markers into labels, painting regions into `f` with fresh labels.
///
/// Fresh labels count upwards from the largest given label.
pub fn resolve_markers(
  f: &mut MarkingFunction,
  mesh: &SimplicialMesh,
  markers: Vec<Marker>,
) -> Result<Vec<usize>> {
  let mut next = markers
    .iter()
    .filter_map(|m| match m {
      Marker::Label(label) => Some(*label),
      Marker::Region(_) => None,
    })
    .max()
    .unwrap_or(0);

  let mut labels = Vec::with_capacity(markers.len());
  for marker in markers {
    match marker {
      Marker::Label(label) => labels.push(label),
      Marker::Region(region) => {
        next += 1;
        let nmarked = region.mark(f, mesh, next)?;
        tracing::debug!("painted region with label {next} onto {nmarked} entities");
        labels.push(next);
      }
    }
  }
  Ok(labels)
}

/// Whether `a` and `b` differ by at most `eps`.
pub fn near(a: f64, b: f64, eps: f64) -> bool {
  (a - b).abs() <= eps
}
