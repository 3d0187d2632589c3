use super::coord::{Coord, CoordRef};
use crate::Dim;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
  min: Coord,
  max: Coord,
}

impl Aabb {
  pub fn new(min: Coord, max: Coord) -> Self {
    assert_eq!(min.len(), max.len());
    Self { min, max }
  }
  /// Contains nothing. Neutral element of [`Aabb::union`].
  pub fn empty(dim: Dim) -> Self {
    Self::new(
      Coord::from_element(dim, f64::INFINITY),
      Coord::from_element(dim, f64::NEG_INFINITY),
    )
  }
  pub fn from_points<'a>(dim: Dim, points: impl IntoIterator<Item = CoordRef<'a>>) -> Self {
    points.into_iter().fold(Self::empty(dim), |mut aabb, p| {
      aabb.insert(p);
      aabb
    })
  }

  pub fn dim(&self) -> Dim {
    self.min.len()
  }
  pub fn min(&self) -> &Coord {
    &self.min
  }
  pub fn max(&self) -> &Coord {
    &self.max
  }
  pub fn is_empty(&self) -> bool {
    self.min.iter().zip(self.max.iter()).any(|(lo, hi)| lo > hi)
  }

  pub fn side_lengths(&self) -> Coord {
    if self.is_empty() {
      return Coord::zeros(self.dim());
    }
    &self.max - &self.min
  }
  /// The largest side length.
  pub fn max_extent(&self) -> f64 {
    self.side_lengths().max()
  }
  pub fn longest_axis(&self) -> usize {
    self.side_lengths().imax()
  }
  pub fn center(&self) -> Coord {
    (&self.min + &self.max) / 2.0
  }

  pub fn insert(&mut self, point: CoordRef) {
    for i in 0..self.dim() {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }
  pub fn union(&self, other: &Self) -> Self {
    Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
  }
  pub fn padded(mut self, pad: f64) -> Self {
    self.min.add_scalar_mut(-pad);
    self.max.add_scalar_mut(pad);
    self
  }

  pub fn contains_point(&self, point: CoordRef) -> bool {
    (0..self.dim()).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
  }
}
