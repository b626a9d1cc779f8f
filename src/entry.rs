/// A key-value pair copied out of a [`SkipList`](crate::SkipList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entry<K, V> {
  key: K,
  value: V,
}

impl<K, V> Entry<K, V> {
  /// Creates a new entry.
  #[inline]
  pub const fn new(key: K, value: V) -> Self {
    Self { key, value }
  }

  /// Returns the key of the entry.
  #[inline]
  pub const fn key(&self) -> &K {
    &self.key
  }

  /// Returns the value of the entry.
  #[inline]
  pub const fn value(&self) -> &V {
    &self.value
  }

  /// Consumes the entry, returning its key and value.
  #[inline]
  pub fn into_parts(self) -> (K, V) {
    (self.key, self.value)
  }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
  #[inline]
  fn from((key, value): (K, V)) -> Self {
    Self { key, value }
  }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
  #[inline]
  fn from(ent: Entry<K, V>) -> Self {
    ent.into_parts()
  }
}
