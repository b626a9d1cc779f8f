use core::{
  borrow::Borrow,
  ops::{Bound, RangeBounds},
};

use super::{Comparator, Entry, Error, Iter, Options, SkipList};

impl<K, V, C: Comparator<K>> SkipList<K, V, C> {
  /// Create a skiplist with [`Options`] and a custom [`Comparator`], seeded with `entries`.
  ///
  /// Later duplicates overwrite earlier ones.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::{Ascend, Options, SkipList};
  ///
  /// let list = SkipList::from_entries(Options::new(), Ascend, [(3, "c"), (1, "a"), (3, "C")]).unwrap();
  /// assert_eq!(list.len(), 2);
  /// assert_eq!(list.get(&3), Some("C"));
  /// ```
  pub fn from_entries<I>(opts: Options, cmp: C, entries: I) -> Result<Self, Error>
  where
    I: IntoIterator<Item = (K, V)>,
  {
    let this = Self::with_options_and_comparator(opts, cmp)?;
    this.insert_all(entries);
    Ok(this)
  }

  /// Inserts a key-value pair. If the key already exists, its value is replaced in place.
  ///
  /// Returns `true` if the number of entries grew, that is, the key was absent or had been
  /// lazily removed.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, &str>::new().unwrap();
  /// assert!(list.insert(2, "hello"));
  /// assert!(!list.insert(2, "bye"));
  /// assert_eq!(list.get(&2), Some("bye"));
  /// assert_eq!(list.len(), 1);
  /// ```
  #[inline]
  pub fn insert(&self, key: K, value: V) -> bool {
    self.inner.write().insert(key, value, &self.cmp)
  }

  /// Inserts every pair under a single exclusive lock, so concurrent readers observe either
  /// none or all of them. Returns the number of entries the skiplist grew by.
  pub fn insert_all<I>(&self, entries: I) -> usize
  where
    I: IntoIterator<Item = (K, V)>,
  {
    let mut inner = self.inner.write();
    let mut grown = 0;
    for (key, value) in entries {
      if inner.insert(key, value, &self.cmp) {
        grown += 1;
      }
    }
    grown
  }

  /// Removes a key, returning its value if it was present.
  ///
  /// The node is unlinked from every level at once. Removing an absent key leaves the
  /// skiplist untouched. A lazily removed key is absent, but its pending node is unlinked.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, &str>::new().unwrap();
  /// list.insert(2, "bar");
  /// assert_eq!(list.remove(&2), Some("bar"));
  /// assert_eq!(list.remove(&2), None);
  /// ```
  #[inline]
  pub fn remove(&self, key: &K) -> Option<V> {
    self.inner.write().remove(key, &self.cmp)
  }

  /// Removes every key under a single exclusive lock. Returns the number of entries removed.
  pub fn remove_all<I>(&self, keys: I) -> usize
  where
    I: IntoIterator,
    I::Item: Borrow<K>,
  {
    let mut inner = self.inner.write();
    keys
      .into_iter()
      .filter_map(|k| inner.remove(<I::Item as Borrow<K>>::borrow(&k), &self.cmp))
      .count()
  }

  /// Marks a key as removed without unlinking its node, returns `true` if the key was present.
  ///
  /// The key disappears from lookups, iteration and [`len`](SkipList::len) immediately. The node
  /// stays linked until [`clean`](SkipList::clean), and a later [`insert`](SkipList::insert) of the
  /// same key revives it in place.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, i32>::new().unwrap();
  /// list.insert(1, 1);
  /// assert!(list.lazy_remove(&1));
  /// assert!(!list.contains_key(&1));
  /// assert_eq!(list.pending_tombstones(), 1);
  /// assert_eq!(list.clean(), 1);
  /// assert_eq!(list.pending_tombstones(), 0);
  /// ```
  #[inline]
  pub fn lazy_remove(&self, key: &K) -> bool {
    self.inner.write().lazy_remove(key, &self.cmp)
  }

  /// Physically removes every lazily removed node that has not been revived since.
  ///
  /// Holds the exclusive lock for the whole sweep. Returns the number of nodes swept.
  pub fn clean(&self) -> usize {
    let swept = self.inner.write().clean(&self.cmp);

    #[cfg(feature = "tracing")]
    tracing::debug!(swept, "swept tombstones");

    swept
  }

  /// Removes every entry.
  #[inline]
  pub fn clear(&self) {
    self.inner.write().clear();
  }

  /// Returns `true` if the key is present.
  #[inline]
  pub fn contains_key(&self, key: &K) -> bool {
    self.inner.read().find_live(key, &self.cmp).is_some()
  }

  /// Calls `f` with a reference to the value of `key` under the shared lock.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<u8, String>::new().unwrap();
  /// list.insert(1, "hello".to_string());
  /// assert_eq!(list.get_with(&1, |v| v.len()), Some(5));
  /// ```
  #[inline]
  pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
    let inner = self.inner.read();
    inner
      .find_live(key, &self.cmp)
      .map(|id| f(&inner.node(id).value))
  }

  /// Returns the number of keys less than or equal to `key`.
  #[inline]
  pub fn rank(&self, key: &K) -> usize {
    self.inner.read().rank(key, &self.cmp)
  }

  /// Moves every entry with a key greater than or equal to `pivot` into a new skiplist, built
  /// with the same options and comparator. The moved nodes keep their levels.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, ()>::new().unwrap();
  /// list.insert_all((0..10).map(|i| (i, ())));
  /// let upper = list.split_off(&6);
  /// assert_eq!(list.len(), 6);
  /// assert_eq!(upper.len(), 4);
  /// assert_eq!(*upper.min().unwrap().key(), 6);
  /// ```
  pub fn split_off(&self, pivot: &K) -> Self
  where
    C: Clone,
  {
    let moved = self.inner.write().split_off(pivot, &self.cmp, &self.opts);

    #[cfg(feature = "tracing")]
    tracing::debug!(moved = moved.len, "split skiplist");

    Self::from_inner(self.opts, self.cmp.clone(), moved)
  }
}

impl<K, V: Clone, C: Comparator<K>> SkipList<K, V, C> {
  /// Returns a copy of the value of `key`, if present.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, &str>::new().unwrap();
  /// list.insert(0, "bar");
  /// assert_eq!(list.get(&0), Some("bar"));
  /// assert_eq!(list.get(&1), None);
  /// ```
  #[inline]
  pub fn get(&self, key: &K) -> Option<V> {
    self.get_with(key, V::clone)
  }
}

impl<K: Clone, V: Clone, C: Comparator<K>> SkipList<K, V, C> {
  /// Returns the entry with the smallest key.
  #[inline]
  pub fn min(&self) -> Option<Entry<K, V>> {
    let inner = self.inner.read();
    inner.min.map(|id| inner.entry(id))
  }

  /// Returns the entry with the largest key.
  #[inline]
  pub fn max(&self) -> Option<Entry<K, V>> {
    let inner = self.inner.read();
    inner.max.map(|id| inner.entry(id))
  }

  /// Returns the entry at 0-based position `rank` in key order.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, ()>::new().unwrap();
  /// list.insert_all([(30, ()), (10, ()), (20, ())]);
  /// assert_eq!(*list.select(1).unwrap().key(), 20);
  /// assert!(list.select(3).is_none());
  /// ```
  #[inline]
  pub fn select(&self, rank: usize) -> Option<Entry<K, V>> {
    let inner = self.inner.read();
    inner.nth(rank).map(|id| inner.entry(id))
  }

  /// Returns the first entry with a key greater than `key`.
  #[inline]
  pub fn successor(&self, key: &K) -> Option<Entry<K, V>> {
    let inner = self.inner.read();
    inner.live_gt(key, &self.cmp).map(|id| inner.entry(id))
  }

  /// Returns the last entry with a key less than `key`.
  #[inline]
  pub fn predecessor(&self, key: &K) -> Option<Entry<K, V>> {
    let inner = self.inner.read();
    inner.live_lt(key, &self.cmp).map(|id| inner.entry(id))
  }

  /// Returns a sorted copy of every entry, taken under one shared lock.
  pub fn to_vec(&self) -> Vec<Entry<K, V>> {
    let inner = self.inner.read();
    let mut out = Vec::with_capacity(inner.len);
    let mut cur = inner.first();
    while let Some(id) = cur {
      out.push(inner.entry(id));
      cur = inner.step(id);
    }
    out
  }

  /// Returns a cursor positioned before the first entry.
  ///
  /// See [`Iter`] for the consistency guarantees.
  #[inline]
  pub fn iter(&self) -> Iter<'_, K, V, C> {
    Iter::new(self, Bound::Unbounded, Bound::Unbounded, false)
  }

  /// Returns a cursor positioned after the last entry, [`Iter::prev`] yields the maximum first.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, ()>::new().unwrap();
  /// list.insert_all([(1, ()), (2, ()), (3, ())]);
  /// let mut it = list.iter_from_end();
  /// assert_eq!(*it.prev().unwrap().key(), 3);
  /// assert_eq!(*it.prev().unwrap().key(), 2);
  /// ```
  #[inline]
  pub fn iter_from_end(&self) -> Iter<'_, K, V, C> {
    Iter::new(self, Bound::Unbounded, Bound::Unbounded, true)
  }

  /// Returns a cursor positioned before the first entry whose key is greater than or equal to `key`.
  #[inline]
  pub fn iter_from(&self, key: &K) -> Iter<'_, K, V, C> {
    Iter::new(self, Bound::Included(key.clone()), Bound::Unbounded, false)
  }

  /// Returns a cursor over the entries whose keys lie in `range`, positioned before the first one.
  ///
  /// `list.range(start..end)` covers the half-open interval `[start, end)`. An empty or inverted
  /// range yields an empty cursor.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, ()>::new().unwrap();
  /// list.insert_all((0..10).map(|i| (i, ())));
  /// let keys: Vec<_> = list.range(3..6).map(|ent| *ent.key()).collect();
  /// assert_eq!(keys, [3, 4, 5]);
  /// assert_eq!(list.range(6..3).count(), 0);
  /// ```
  #[inline]
  pub fn range<R: RangeBounds<K>>(&self, range: R) -> Iter<'_, K, V, C> {
    Iter::new(
      self,
      range.start_bound().cloned(),
      range.end_bound().cloned(),
      false,
    )
  }

  /// Like [`range`](SkipList::range), but positioned after the last entry in `range`, so
  /// [`Iter::prev`] walks it backward.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, ()>::new().unwrap();
  /// list.insert_all((0..10).map(|i| (i, ())));
  /// let mut it = list.range_from_end(3..6);
  /// assert_eq!(*it.prev().unwrap().key(), 5);
  /// assert_eq!(*it.prev().unwrap().key(), 4);
  /// assert_eq!(*it.prev().unwrap().key(), 3);
  /// assert!(it.prev().is_none());
  /// ```
  #[inline]
  pub fn range_from_end<R: RangeBounds<K>>(&self, range: R) -> Iter<'_, K, V, C> {
    Iter::new(
      self,
      range.start_bound().cloned(),
      range.end_bound().cloned(),
      true,
    )
  }
}
