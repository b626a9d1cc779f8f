use core::{cmp, ptr};

use super::{Comparator, Error, Inner, Options, SkipList};

impl<K, V, C> SkipList<K, V, C>
where
  K: Clone,
  V: Clone,
  C: Comparator<K> + Clone,
{
  /// Merges two skiplists into a new one. Neither operand is modified.
  ///
  /// Both level-0 chains are scanned once, in order. When a key is present in both lists the
  /// value of `b` wins. Every node of the result gets a freshly sampled level, and the result is
  /// built with the options and the comparator of `a`.
  ///
  /// Both operands are share-locked for the whole scan, always in the same order, so two
  /// concurrent `merge(a, b)` and `merge(b, a)` cannot deadlock. Merging a list with itself
  /// locks it once.
  ///
  /// ## Errors
  ///
  /// - [`Error::ComparatorMismatch`] if the comparators do not order keys identically.
  /// - [`Error::MaxLevelMismatch`] if the lists were built with different maximum levels.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let a = SkipList::<i32, &str>::new().unwrap();
  /// a.insert_all([(1, "a1"), (3, "a3")]);
  /// let b = SkipList::<i32, &str>::new().unwrap();
  /// b.insert_all([(2, "b2"), (3, "b3")]);
  ///
  /// let merged = SkipList::merge(&a, &b).unwrap();
  /// assert_eq!(merged.len(), 3);
  /// assert_eq!(merged.get(&3), Some("b3"));
  /// ```
  pub fn merge(a: &Self, b: &Self) -> Result<Self, Error> {
    if !a.cmp.is_equivalent(&b.cmp) {
      #[cfg(feature = "tracing")]
      tracing::warn!("refuse to merge skiplists with non-equivalent comparators");
      return Err(Error::ComparatorMismatch);
    }

    if a.max_level() != b.max_level() {
      #[cfg(feature = "tracing")]
      tracing::warn!(
        left = a.max_level(),
        right = b.max_level(),
        "refuse to merge skiplists with different max levels"
      );
      return Err(Error::MaxLevelMismatch {
        left: a.max_level(),
        right: b.max_level(),
      });
    }

    let inner = if ptr::eq(a, b) {
      let guard = a.inner.read();
      merge_chains(&guard, &guard, &a.cmp, &a.opts)
    } else if (a as *const Self) < (b as *const Self) {
      let ga = a.inner.read();
      let gb = b.inner.read();
      merge_chains(&ga, &gb, &a.cmp, &a.opts)
    } else {
      let gb = b.inner.read();
      let ga = a.inner.read();
      merge_chains(&ga, &gb, &a.cmp, &a.opts)
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(merged = inner.len, "merged skiplists");

    Ok(Self::from_inner(a.opts, a.cmp.clone(), inner))
  }
}

/// Interleaves the live level-0 chains of `a` and `b` into a fresh list built with `opts`.
fn merge_chains<K, V, C>(a: &Inner<K, V>, b: &Inner<K, V>, cmp: &C, opts: &Options) -> Inner<K, V>
where
  K: Clone,
  V: Clone,
  C: Comparator<K>,
{
  let mut out = Inner::new(opts);
  let mut tails = out.tails();

  let mut x = a.first();
  let mut y = b.first();
  loop {
    let (id, from) = match (x, y) {
      (None, None) => break,
      (Some(ix), None) => {
        x = a.step(ix);
        (ix, a)
      }
      (None, Some(iy)) => {
        y = b.step(iy);
        (iy, b)
      }
      (Some(ix), Some(iy)) => match cmp.compare(&a.node(ix).key, &b.node(iy).key) {
        cmp::Ordering::Less => {
          x = a.step(ix);
          (ix, a)
        }
        cmp::Ordering::Greater => {
          y = b.step(iy);
          (iy, b)
        }
        cmp::Ordering::Equal => {
          x = a.step(ix);
          y = b.step(iy);
          (iy, b)
        }
      },
    };

    let node = from.node(id);
    out.push_back(&mut tails, node.key.clone(), node.value.clone());
  }

  out
}
