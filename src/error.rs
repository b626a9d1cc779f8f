/// Error type for the rwskl crate.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
  /// Indicates that the configured maximum level is zero or above [`MAX_LEVEL_CEILING`](crate::MAX_LEVEL_CEILING).
  #[error("max level {0} is out of range, must be in [1, 64]")]
  InvalidMaxLevel(usize),

  /// Indicates that the configured promotion probability is not in the open interval `(0, 1)`.
  #[error("promotion probability {0} is out of range, must be in (0, 1)")]
  InvalidProbability(f64),

  /// Indicates that two skiplists cannot be merged because their comparators do not
  /// order keys identically.
  #[error("cannot merge skiplists with non-equivalent comparators")]
  ComparatorMismatch,

  /// Indicates that two skiplists cannot be merged because they were built with
  /// different maximum levels.
  #[error("cannot merge skiplists with different max levels (left {left}, right {right})")]
  MaxLevelMismatch {
    /// The maximum level of the first operand.
    left: usize,
    /// The maximum level of the second operand.
    right: usize,
  },
}
