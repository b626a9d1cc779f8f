use crate::{Error, DEFAULT_MAX_LEVEL, DEFAULT_PROBABILITY, MAX_LEVEL_CEILING};

/// Options for [`SkipList`](crate::SkipList).
#[viewit::viewit(vis_all = "pub(crate)", getters(skip), setters(skip))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
  max_level: usize,
  probability: f64,
  seed: Option<u64>,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      max_level: DEFAULT_MAX_LEVEL,
      probability: DEFAULT_PROBABILITY,
      seed: None,
    }
  }

  /// Set the number of levels a node may be promoted to.
  ///
  /// A node is assigned a level in `[0, max_level)`. The value must be in `[1, 64]`,
  /// `1` degenerates the skiplist into a sorted linked list.
  ///
  /// The default value is `16`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::Options;
  ///
  /// let opts = Options::new().with_max_level(12);
  /// assert_eq!(opts.max_level(), 12);
  /// ```
  #[inline]
  pub const fn with_max_level(mut self, max_level: usize) -> Self {
    self.max_level = max_level;
    self
  }

  /// Set the probability that a node present at level `i` is also present at level `i + 1`.
  ///
  /// The value must be in the open interval `(0, 1)`. Values near `0` make the skiplist behave
  /// like a plain linked list, values near `1` build tall towers.
  ///
  /// The default value is `0.5`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::Options;
  ///
  /// let opts = Options::new().with_probability(0.25);
  /// ```
  #[inline]
  pub const fn with_probability(mut self, probability: f64) -> Self {
    self.probability = probability;
    self
  }

  /// Set the seed of the level generator, making the shape of the skiplist reproducible.
  ///
  /// By default the generator is seeded from the operating system.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::Options;
  ///
  /// let opts = Options::new().with_seed(42);
  /// assert_eq!(opts.seed(), Some(42));
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Returns the number of levels a node may be promoted to.
  #[inline]
  pub const fn max_level(&self) -> usize {
    self.max_level
  }

  /// Returns the promotion probability.
  #[inline]
  pub const fn probability(&self) -> f64 {
    self.probability
  }

  /// Returns the seed of the level generator, if any.
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }

  /// Checks that the options describe a valid skiplist.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::{Error, Options};
  ///
  /// assert!(Options::new().validate().is_ok());
  /// assert_eq!(Options::new().with_max_level(0).validate(), Err(Error::InvalidMaxLevel(0)));
  /// ```
  pub fn validate(&self) -> Result<(), Error> {
    if self.max_level == 0 || self.max_level > MAX_LEVEL_CEILING {
      return Err(Error::InvalidMaxLevel(self.max_level));
    }

    // NaN fails both comparisons.
    if !(self.probability > 0.0 && self.probability < 1.0) {
      return Err(Error::InvalidProbability(self.probability));
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_options_are_valid() {
    let opts = Options::default();
    assert_eq!(opts.max_level(), DEFAULT_MAX_LEVEL);
    assert_eq!(opts.probability(), DEFAULT_PROBABILITY);
    assert_eq!(opts.seed(), None);
    assert!(opts.validate().is_ok());
  }

  #[test]
  fn test_max_level_bounds() {
    assert!(Options::new().with_max_level(1).validate().is_ok());
    assert!(Options::new().with_max_level(64).validate().is_ok());
    assert_eq!(
      Options::new().with_max_level(65).validate(),
      Err(Error::InvalidMaxLevel(65))
    );
    assert_eq!(
      Options::new().with_max_level(0).validate(),
      Err(Error::InvalidMaxLevel(0))
    );
  }

  #[test]
  fn test_probability_bounds() {
    for p in [0.0, 1.0, -0.5, 1.5] {
      assert_eq!(
        Options::new().with_probability(p).validate(),
        Err(Error::InvalidProbability(p))
      );
    }
    assert!(matches!(
      Options::new().with_probability(f64::NAN).validate(),
      Err(Error::InvalidProbability(_))
    ));
    assert!(Options::new().with_probability(0.001).validate().is_ok());
    assert!(Options::new().with_probability(0.999).validate().is_ok());
  }
}
