use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::Options;

/// After a new node is inserted into a [`SkipList`](crate::SkipList), a level
/// generator decides how many levels above level 0 the node is linked into.
pub(crate) trait LevelGenerator {
  /// The total number of levels that are assumed to exist for this level generator.
  fn total(&self) -> usize;

  /// Generate a random level for a new node in the range `[0, total)`.
  ///
  /// This must never return a level that is `>= self.total()`.
  fn random(&mut self) -> usize;
}

/// A level generator which produces truncated geometrically distributed levels.
///
/// The probability that a node reaches level `h` is `p^h`, truncated at the top level. Thresholds
/// are precomputed so that only a single random number is drawn per node.
#[derive(Debug)]
pub(crate) struct Geometric {
  total: usize,
  thresholds: Vec<u64>,
  rng: StdRng,
}

impl Geometric {
  /// Seeded from `opts`, or from the operating system. `opts` must already be validated.
  pub(crate) fn from_validated(opts: &Options) -> Self {
    let rng = match opts.seed() {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    Self::build(opts.max_level(), opts.probability(), rng)
  }

  fn build(total: usize, p: f64, rng: StdRng) -> Self {
    // thresholds[h] ~ u64::MAX * p^h, a draw below it promotes the node past level h - 1.
    let mut thresholds = Vec::with_capacity(total);
    let mut acc = 1f64;
    for _ in 0..total {
      thresholds.push((u64::MAX as f64 * acc) as u64);
      acc *= p;
    }

    Self {
      total,
      thresholds,
      rng,
    }
  }

  /// Returns a generator with the same distribution and a stream of its own.
  ///
  /// The new seed is derived from the current state without advancing it, so forking a seeded
  /// generator is reproducible.
  pub(crate) fn fork(&self) -> Self {
    let seed: u64 = self.rng.clone().random();
    Self {
      total: self.total,
      thresholds: self.thresholds.clone(),
      rng: StdRng::seed_from_u64(seed),
    }
  }
}

impl LevelGenerator for Geometric {
  #[inline]
  fn total(&self) -> usize {
    self.total
  }

  #[inline]
  fn random(&mut self) -> usize {
    let rnd: u64 = self.rng.random();
    let mut h = 0;
    while h + 1 < self.total && rnd < self.thresholds[h + 1] {
      h += 1;
    }
    h
  }
}
