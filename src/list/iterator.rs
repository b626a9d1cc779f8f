use core::ops::Bound;
use std::collections::VecDeque;

use super::{Comparator, Entry, SkipList};
use crate::arena::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
  /// Before the front of the replay buffer.
  Before,
  /// On `buf[i]`.
  At(usize),
  /// After the back of the replay buffer.
  After,
}

/// A bidirectional cursor over a [`SkipList`].
///
/// The cursor is a weakly consistent live view, not a snapshot. It never holds the lock of the
/// list between two steps: every step takes the shared lock, moves, copies the entry out, and
/// releases the lock. Entries already visited are kept in a replay buffer, so stepping back over
/// them with [`prev`](Iter::prev) is a local operation that always yields what was seen going
/// forward. Entries inserted or removed ahead of the cursor by other threads may or may not be
/// observed. When the node under the cursor is physically removed, the next step re-seeks by key,
/// so keys are always yielded in strictly monotonic order.
///
/// A fresh cursor from [`iter`](SkipList::iter), [`iter_from`](SkipList::iter_from) or
/// [`range`](SkipList::range) sits before its first entry, so [`prev`](Iter::prev) yields nothing
/// until the cursor has moved forward. [`iter_from_end`](SkipList::iter_from_end) and
/// [`range_from_end`](SkipList::range_from_end) sit after the last entry instead.
///
/// Stepping back past the front of the replay buffer finds the predecessor by a descent from the
/// header, the list keeps no backward links.
pub struct Iter<'a, K, V, C> {
  list: &'a SkipList<K, V, C>,
  lower: Bound<K>,
  upper: Bound<K>,
  buf: VecDeque<Entry<K, V>>,
  pos: Position,
  /// The node of `buf.back()`, used to step forward without a descent while it stays linked.
  back: Option<NodeId>,
}

impl<'a, K, V, C> Iter<'a, K, V, C>
where
  K: Clone,
  V: Clone,
  C: Comparator<K>,
{
  pub(super) fn new(list: &'a SkipList<K, V, C>, lower: Bound<K>, upper: Bound<K>, from_end: bool) -> Self {
    Self {
      list,
      lower,
      upper,
      buf: VecDeque::new(),
      pos: if from_end {
        Position::After
      } else {
        Position::Before
      },
      back: None,
    }
  }

  /// Returns the key at the current position.
  #[inline]
  pub fn key(&self) -> Option<&K> {
    self.entry().map(Entry::key)
  }

  /// Returns the value at the current position, as it was when the cursor stepped on it.
  #[inline]
  pub fn value(&self) -> Option<&V> {
    self.entry().map(Entry::value)
  }

  /// Returns the entry at the current position.
  #[inline]
  pub fn entry(&self) -> Option<&Entry<K, V>> {
    match self.pos {
      Position::At(i) => self.buf.get(i),
      _ => None,
    }
  }

  /// Steps back to the previous entry and returns it, or returns `None` (leaving the cursor
  /// before the first entry) if there is none in range.
  pub fn prev(&mut self) -> Option<Entry<K, V>> {
    match self.pos {
      Position::At(i) if i > 0 => {
        self.pos = Position::At(i - 1);
        return self.buf.get(i - 1).cloned();
      }
      Position::After if !self.buf.is_empty() => {
        let last = self.buf.len() - 1;
        self.pos = Position::At(last);
        return self.buf.get(last).cloned();
      }
      Position::Before if self.buf.is_empty() => return None,
      _ => {}
    }

    let cmp = self.list.comparator();
    let fetched = {
      let inner = self.list.inner.read();
      let id = match self.buf.front() {
        Some(front) => inner.live_lt(front.key(), cmp),
        None => inner.seek_upper(self.upper.as_ref(), cmp),
      };
      id.filter(|id| above_lower(cmp, &self.lower, &inner.node(*id).key))
        .map(|id| (id, inner.entry(id)))
    };

    match fetched {
      Some((id, ent)) => {
        if self.buf.is_empty() {
          self.back = Some(id);
        }
        self.buf.push_front(ent.clone());
        self.pos = Position::At(0);
        Some(ent)
      }
      None => {
        self.pos = Position::Before;
        None
      }
    }
  }

  /// Returns every entry covered by the bounds of the cursor, in order, without moving it.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use rwskl::SkipList;
  ///
  /// let list = SkipList::<i32, ()>::new().unwrap();
  /// list.insert_all((0..5).map(|i| (i, ())));
  ///
  /// let mut it = list.range(1..4);
  /// it.next();
  /// assert_eq!(it.entries().len(), 3);
  /// assert_eq!(it.key(), Some(&1));
  /// ```
  pub fn entries(&self) -> Vec<Entry<K, V>> {
    Self::new(self.list, self.lower.clone(), self.upper.clone(), false).collect()
  }
}

impl<K, V, C> Iterator for Iter<'_, K, V, C>
where
  K: Clone,
  V: Clone,
  C: Comparator<K>,
{
  type Item = Entry<K, V>;

  /// Steps to the next entry and returns it, or returns `None` (leaving the cursor after the
  /// last entry) if there is none in range.
  fn next(&mut self) -> Option<Self::Item> {
    match self.pos {
      Position::At(i) if i + 1 < self.buf.len() => {
        self.pos = Position::At(i + 1);
        return self.buf.get(i + 1).cloned();
      }
      Position::Before if !self.buf.is_empty() => {
        self.pos = Position::At(0);
        return self.buf.front().cloned();
      }
      Position::After if self.buf.is_empty() => return None,
      _ => {}
    }

    let cmp = self.list.comparator();
    let fetched = {
      let inner = self.list.inner.read();
      let id = match (self.buf.back(), self.back) {
        // still linked, the tower is trustworthy
        (Some(_), Some(back)) if inner.arena.get(back).is_some() => inner.step(back),
        (Some(last), _) => inner.live_gt(last.key(), cmp),
        (None, _) => inner.seek_lower(self.lower.as_ref(), cmp),
      };
      id.filter(|id| below_upper(cmp, &self.upper, &inner.node(*id).key))
        .map(|id| (id, inner.entry(id)))
    };

    match fetched {
      Some((id, ent)) => {
        self.buf.push_back(ent.clone());
        self.back = Some(id);
        self.pos = Position::At(self.buf.len() - 1);
        Some(ent)
      }
      None => {
        self.pos = Position::After;
        None
      }
    }
  }
}

#[inline]
fn above_lower<K, C: Comparator<K>>(cmp: &C, bound: &Bound<K>, key: &K) -> bool {
  match bound {
    Bound::Unbounded => true,
    Bound::Included(lower) => cmp.compare(key, lower).is_ge(),
    Bound::Excluded(lower) => cmp.compare(key, lower).is_gt(),
  }
}

#[inline]
fn below_upper<K, C: Comparator<K>>(cmp: &C, bound: &Bound<K>, key: &K) -> bool {
  match bound {
    Bound::Unbounded => true,
    Bound::Included(upper) => cmp.compare(key, upper).is_le(),
    Bound::Excluded(upper) => cmp.compare(key, upper).is_lt(),
  }
}
