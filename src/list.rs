use core::fmt;

use parking_lot::RwLock;

use super::{Ascend, Comparator, Entry, Error, Options};

mod api;
mod inner;
use inner::Inner;
mod iterator;
pub use iterator::Iter;
mod merge;


/// An ordered map based on a skiplist, guarded by one reader/writer lock.
///
/// Nodes live in an arena owned by the list and are linked by generational ids.
/// Reads ([`get`](SkipList::get), [`min`](SkipList::min), iterator steps, ...) share the lock,
/// structural mutations ([`insert`](SkipList::insert), [`remove`](SkipList::remove),
/// [`lazy_remove`](SkipList::lazy_remove), ...) hold it exclusively for their whole
/// duration, so a predecessor trace computed during a descent never goes stale.
///
/// All operations take `&self`, share the list between threads with an `Arc`.
pub struct SkipList<K, V, C = Ascend> {
  opts: Options,
  cmp: C,
  inner: RwLock<Inner<K, V>>,
}

impl<K, V> SkipList<K, V> {
  /// Create a new, empty skiplist with the default [`Options`] and the natural ordering of `K`.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<u64, u64>::new().unwrap();
  /// assert!(list.is_empty());
  /// ```
  #[inline]
  pub fn new() -> Result<Self, Error> {
    Self::with_options(Options::new())
  }

  /// Like [`SkipList::new`], but with [`Options`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::{Options, SkipList};
  ///
  /// let list = SkipList::<u64, u64>::with_options(Options::new().with_max_level(8)).unwrap();
  /// assert_eq!(list.max_level(), 8);
  /// ```
  #[inline]
  pub fn with_options(opts: Options) -> Result<Self, Error> {
    Self::with_options_and_comparator(opts, Ascend)
  }
}

impl<K, V, C> SkipList<K, V, C> {
  /// Like [`SkipList::new`], but with a custom [`Comparator`].
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::{Descend, SkipList};
  ///
  /// let list = SkipList::<u64, (), _>::with_comparator(Descend).unwrap();
  /// list.insert(1, ());
  /// list.insert(2, ());
  /// assert_eq!(*list.min().unwrap().key(), 2);
  /// ```
  #[inline]
  pub fn with_comparator(cmp: C) -> Result<Self, Error> {
    Self::with_options_and_comparator(Options::new(), cmp)
  }

  /// Like [`SkipList::new`], but with [`Options`] and a custom [`Comparator`].
  pub fn with_options_and_comparator(opts: Options, cmp: C) -> Result<Self, Error> {
    opts.validate()?;
    Ok(Self::construct(opts, cmp))
  }

  /// `opts` must already be validated.
  fn construct(opts: Options, cmp: C) -> Self {
    #[cfg(feature = "tracing")]
    tracing::debug!(
      max_level = opts.max_level(),
      probability = opts.probability(),
      "create skiplist"
    );

    Self {
      inner: RwLock::new(Inner::new(&opts)),
      opts,
      cmp,
    }
  }

  #[inline]
  fn from_inner(opts: Options, cmp: C, inner: Inner<K, V>) -> Self {
    Self {
      opts,
      cmp,
      inner: RwLock::new(inner),
    }
  }

  /// Returns the options the skiplist was built with.
  #[inline]
  pub const fn options(&self) -> &Options {
    &self.opts
  }

  /// Returns the comparator of the skiplist.
  #[inline]
  pub const fn comparator(&self) -> &C {
    &self.cmp
  }

  /// Returns the number of levels a node may be promoted to.
  #[inline]
  pub const fn max_level(&self) -> usize {
    self.opts.max_level()
  }

  /// Returns the promotion probability.
  #[inline]
  pub const fn probability(&self) -> f64 {
    self.opts.probability()
  }

  /// Returns the number of live entries in the skiplist.
  ///
  /// Lazily removed entries are not counted, even before they are swept by
  /// [`clean`](SkipList::clean).
  #[inline]
  pub fn len(&self) -> usize {
    self.inner.read().len
  }

  /// Returns `true` if the skiplist has no live entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the highest level occupied by any linked node, `0` when the skiplist is empty.
  ///
  /// Lazily removed nodes stay linked and keep their levels occupied until they are swept.
  #[inline]
  pub fn level(&self) -> usize {
    self.inner.read().level
  }

  /// Returns the number of levels currently in use, `0` when no node is linked.
  #[inline]
  pub fn height(&self) -> usize {
    let inner = self.inner.read();
    if inner.head[0].is_none() {
      0
    } else {
      inner.level + 1
    }
  }

  /// Returns the number of lazily removed entries still waiting for [`clean`](SkipList::clean).
  #[inline]
  pub fn pending_tombstones(&self) -> usize {
    let inner = self.inner.read();
    inner
      .tombstones
      .iter()
      .filter(|id| inner.arena.get(**id).is_some_and(|n| n.tombstone))
      .count()
  }
}

impl<K, V, C: Default> Default for SkipList<K, V, C> {
  #[inline]
  fn default() -> Self {
    Self::construct(Options::new(), C::default())
  }
}

impl<K: Clone, V: Clone, C: Clone> Clone for SkipList<K, V, C> {
  fn clone(&self) -> Self {
    Self::from_inner(self.opts, self.cmp.clone(), self.inner.read().clone())
  }
}

impl<K, V, C: fmt::Debug> fmt::Debug for SkipList<K, V, C> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.read();
    f.debug_struct("SkipList")
      .field("options", &self.opts)
      .field("comparator", &self.cmp)
      .field("len", &inner.len)
      .field("nodes", &inner.arena.len())
      .field("level", &inner.level)
      .field("tombstones", &inner.tombstones.len())
      .finish_non_exhaustive()
  }
}

impl<K, V, C> Extend<(K, V)> for SkipList<K, V, C>
where
  C: Comparator<K>,
{
  #[inline]
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    self.insert_all(iter);
  }
}

impl<'a, K, V, C> IntoIterator for &'a SkipList<K, V, C>
where
  K: Clone,
  V: Clone,
  C: Comparator<K>,
{
  type Item = Entry<K, V>;
  type IntoIter = Iter<'a, K, V, C>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
