use core::{cmp, fmt};

/// Comparator is used by [`SkipList`](crate::SkipList) users to define their own key ordering.
/// e.g. some users may want to order keys in descending order, or order byte strings case-insensitively.
///
/// A comparator must be a total order and must not change its answer for the lifetime of the list
/// it is installed in.
pub trait Comparator<K: ?Sized> {
  /// Compares two keys.
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering;

  /// Returns `true` if `self` and `other` order keys identically.
  ///
  /// [`SkipList::merge`](crate::SkipList::merge) rejects two lists whose comparators are not
  /// equivalent, because their level-0 chains cannot be interleaved.
  fn is_equivalent(&self, other: &Self) -> bool;
}

/// Ascend is a comparator that orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ascend;

impl<K: Ord + ?Sized> Comparator<K> for Ascend {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    a.cmp(b)
  }

  #[inline]
  fn is_equivalent(&self, _: &Self) -> bool {
    true
  }
}

/// Descend is a comparator that orders keys by the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Descend;

impl<K: Ord + ?Sized> Comparator<K> for Descend {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    b.cmp(a)
  }

  #[inline]
  fn is_equivalent(&self, _: &Self) -> bool {
    true
  }
}

/// A comparator backed by a plain function pointer.
///
/// Two `FnComparator`s are equivalent only when they wrap the same function.
pub struct FnComparator<K: ?Sized> {
  f: fn(&K, &K) -> cmp::Ordering,
}

impl<K: ?Sized> FnComparator<K> {
  /// Wraps a comparison function.
  #[inline]
  pub const fn new(f: fn(&K, &K) -> cmp::Ordering) -> Self {
    Self { f }
  }
}

impl<K: ?Sized> Clone for FnComparator<K> {
  #[inline]
  fn clone(&self) -> Self {
    *self
  }
}

impl<K: ?Sized> Copy for FnComparator<K> {}

impl<K: ?Sized> fmt::Debug for FnComparator<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("FnComparator")
      .field(&(self.f as usize as *const ()))
      .finish()
  }
}

impl<K: ?Sized> Comparator<K> for FnComparator<K> {
  #[inline]
  fn compare(&self, a: &K, b: &K) -> cmp::Ordering {
    (self.f)(a, b)
  }

  #[inline]
  fn is_equivalent(&self, other: &Self) -> bool {
    self.f as usize == other.f as usize
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn by_len(a: &str, b: &str) -> cmp::Ordering {
    a.len().cmp(&b.len())
  }

  fn by_len_rev(a: &str, b: &str) -> cmp::Ordering {
    b.len().cmp(&a.len())
  }

  #[test]
  fn test_ascend_descend() {
    assert_eq!(Ascend.compare(&1, &2), cmp::Ordering::Less);
    assert_eq!(Descend.compare(&1, &2), cmp::Ordering::Greater);
    assert_eq!(Comparator::<u8>::compare(&Ascend, &7, &7), cmp::Ordering::Equal);
    assert!(Comparator::<u8>::is_equivalent(&Descend, &Descend));
  }

  #[test]
  fn test_fn_comparator_equivalence() {
    let a = FnComparator::<str>::new(by_len);
    let b = FnComparator::<str>::new(by_len);
    let c = FnComparator::<str>::new(by_len_rev);

    assert_eq!(a.compare("ab", "abc"), cmp::Ordering::Less);
    assert_eq!(c.compare("ab", "abc"), cmp::Ordering::Greater);
    assert!(a.is_equivalent(&b));
    assert!(!a.is_equivalent(&c));
  }
}
