pub mod aabb;
pub mod coord;

use crate::{combo::factorialf, Dim};

/// Volume of the reference simplex.
pub fn refsimp_vol(dim: Dim) -> f64 {
  factorialf(dim).recip()
}
