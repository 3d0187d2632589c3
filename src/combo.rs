pub use num_integer::binomial;

pub fn factorial(num: usize) -> usize {
  (1..=num).product()
}
pub fn factorialf(num: usize) -> f64 {
  factorial(num) as f64
}

/// Sign of a real number or of a permutation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
  #[default]
  Pos = 1,
  Neg = -1,
}
impl Sign {
  pub fn from_bool(b: bool) -> Self {
    if b {
      Self::Pos
    } else {
      Self::Neg
    }
  }
  /// Zero has no sign.
  pub fn from_f64(f: f64) -> Option<Self> {
    if f == 0.0 {
      None
    } else {
      Some(Self::from_bool(f > 0.0))
    }
  }
  pub fn as_f64(self) -> f64 {
    self as i32 as f64
  }
}
impl std::ops::Neg for Sign {
  type Output = Self;
  fn neg(self) -> Self::Output {
    match self {
      Self::Pos => Self::Neg,
      Self::Neg => Self::Pos,
    }
  }
}
impl std::ops::Mul for Sign {
  type Output = Self;
  fn mul(self, other: Self) -> Self::Output {
    Self::from_bool(self == other)
  }
}
