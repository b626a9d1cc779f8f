use core::ops::Bound;

use crate::{
  arena::{Arena, NodeId},
  level::{Geometric, LevelGenerator},
  node::Node,
  Comparator, Entry, Options,
};

/// The lock-protected state of a [`SkipList`](super::SkipList).
///
/// A link of `None` in predecessor position stands for the header, whose tower is `head`.
#[derive(Debug)]
pub(super) struct Inner<K, V> {
  pub(super) arena: Arena<Node<K, V>>,
  pub(super) head: Box<[Option<NodeId>]>,
  /// Highest level occupied by a linked node.
  pub(super) level: usize,
  /// Number of live nodes.
  pub(super) len: usize,
  pub(super) min: Option<NodeId>,
  pub(super) max: Option<NodeId>,
  /// Lazily removed nodes, possibly revived or already unlinked since. Each node is listed
  /// at most once.
  pub(super) tombstones: Vec<NodeId>,
  pub(super) levels: Geometric,
}

impl<K: Clone, V: Clone> Clone for Inner<K, V> {
  /// The copy samples levels from a forked generator, so its shape evolves independently.
  fn clone(&self) -> Self {
    Self {
      arena: self.arena.clone(),
      head: self.head.clone(),
      level: self.level,
      len: self.len,
      min: self.min,
      max: self.max,
      tombstones: self.tombstones.clone(),
      levels: self.levels.fork(),
    }
  }
}

impl<K, V> Inner<K, V> {
  /// `opts` must already be validated.
  pub(super) fn new(opts: &Options) -> Self {
    Self {
      arena: Arena::new(),
      head: vec![None; opts.max_level()].into_boxed_slice(),
      level: 0,
      len: 0,
      min: None,
      max: None,
      tombstones: Vec::new(),
      levels: Geometric::from_validated(opts),
    }
  }

  #[inline]
  pub(super) fn node(&self, id: NodeId) -> &Node<K, V> {
    &self.arena[id]
  }

  #[inline]
  pub(super) fn entry(&self, id: NodeId) -> Entry<K, V>
  where
    K: Clone,
    V: Clone,
  {
    let node = &self.arena[id];
    Entry::new(node.key.clone(), node.value.clone())
  }

  #[inline]
  fn next(&self, pred: Option<NodeId>, level: usize) -> Option<NodeId> {
    match pred {
      None => self.head[level],
      Some(id) => self.arena[id].next(level),
    }
  }

  #[inline]
  fn set_next(&mut self, pred: Option<NodeId>, level: usize, to: Option<NodeId>) {
    match pred {
      None => self.head[level] = to,
      Some(id) => self.arena[id].tower[level] = to,
    }
  }

  /// Returns the first live node at or after `cur` on level 0.
  #[inline]
  pub(super) fn skip_dead(&self, mut cur: Option<NodeId>) -> Option<NodeId> {
    while let Some(id) = cur {
      let node = &self.arena[id];
      if node.is_live() {
        return Some(id);
      }
      cur = node.next(0);
    }
    None
  }

  /// Returns the first live node after `id` on level 0.
  #[inline]
  pub(super) fn step(&self, id: NodeId) -> Option<NodeId> {
    self.skip_dead(self.arena[id].next(0))
  }

  /// Returns the first live node.
  #[inline]
  pub(super) fn first(&self) -> Option<NodeId> {
    self.skip_dead(self.head[0])
  }

  /// Descends from the header, at every level advancing while `advance` accepts the key of
  /// the next node, and returns the node reached on level 0 (`None` being the header).
  ///
  /// When `trace` is not empty, `trace[i]` receives the last node visited on level `i`.
  fn descend(&self, mut advance: impl FnMut(&K) -> bool, trace: &mut [Option<NodeId>]) -> Option<NodeId> {
    let mut x = None;
    for level in (0..=self.level).rev() {
      while let Some(next) = self.next(x, level) {
        if !advance(&self.arena[next].key) {
          break;
        }
        x = Some(next);
      }
      if let Some(slot) = trace.get_mut(level) {
        *slot = x;
      }
    }
    x
  }

  /// Returns the predecessor trace of `key`: for every level, the last node whose key is
  /// less than `key`. Levels above the current level keep the header.
  pub(super) fn trace<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Vec<Option<NodeId>> {
    let mut trace = vec![None; self.head.len()];
    self.descend(|k| cmp.compare(k, key).is_lt(), &mut trace);
    trace
  }

  /// Returns the last node, live or not, whose key is less than `key`.
  #[inline]
  fn last_lt<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    self.descend(|k| cmp.compare(k, key).is_lt(), &mut [])
  }

  /// Returns the last node, live or not, whose key is less than or equal to `key`.
  #[inline]
  fn last_le<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    self.descend(|k| cmp.compare(k, key).is_le(), &mut [])
  }

  /// Returns the node holding `key`, live or not.
  #[inline]
  pub(super) fn find<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    self
      .next(self.last_lt(key, cmp), 0)
      .filter(|id| cmp.compare(&self.arena[*id].key, key).is_eq())
  }

  /// Returns the live node holding `key`.
  #[inline]
  pub(super) fn find_live<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    self
      .find(key, cmp)
      .filter(|id| self.arena[*id].is_live())
  }

  pub(super) fn live_lt<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    let mut cur = self.last_lt(key, cmp);
    while let Some(id) = cur {
      let node = &self.arena[id];
      if node.is_live() {
        return Some(id);
      }
      cur = self.last_lt(&node.key, cmp);
    }
    None
  }

  pub(super) fn live_le<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    let id = self.last_le(key, cmp)?;
    let node = &self.arena[id];
    if node.is_live() {
      Some(id)
    } else {
      self.live_lt(&node.key, cmp)
    }
  }

  #[inline]
  pub(super) fn live_ge<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    self.skip_dead(self.next(self.last_lt(key, cmp), 0))
  }

  #[inline]
  pub(super) fn live_gt<C: Comparator<K>>(&self, key: &K, cmp: &C) -> Option<NodeId> {
    self.skip_dead(self.next(self.last_le(key, cmp), 0))
  }

  /// Returns the first live node satisfying the lower bound.
  pub(super) fn seek_lower<C: Comparator<K>>(&self, bound: Bound<&K>, cmp: &C) -> Option<NodeId> {
    match bound {
      Bound::Unbounded => self.first(),
      Bound::Included(key) => self.live_ge(key, cmp),
      Bound::Excluded(key) => self.live_gt(key, cmp),
    }
  }

  /// Returns the last live node satisfying the upper bound.
  pub(super) fn seek_upper<C: Comparator<K>>(&self, bound: Bound<&K>, cmp: &C) -> Option<NodeId> {
    match bound {
      Bound::Unbounded => self.max,
      Bound::Included(key) => self.live_le(key, cmp),
      Bound::Excluded(key) => self.live_lt(key, cmp),
    }
  }

  /// Widens the cached min/max with a node that just became live.
  fn admit<C: Comparator<K>>(&mut self, id: NodeId, cmp: &C) {
    let key = &self.arena[id].key;
    let is_min = self
      .min
      .map_or(true, |min| cmp.compare(key, &self.arena[min].key).is_lt());
    let is_max = self
      .max
      .map_or(true, |max| cmp.compare(key, &self.arena[max].key).is_gt());

    if is_min {
      self.min = Some(id);
    }
    if is_max {
      self.max = Some(id);
    }
  }

  /// Moves the cached min/max off a node that is about to stop being live.
  /// The node must still be reachable through its own tower.
  fn retire<C: Comparator<K>>(&mut self, id: NodeId, cmp: &C) {
    if self.min == Some(id) {
      self.min = self.step(id);
    }
    if self.max == Some(id) {
      self.max = self.live_lt(&self.arena[id].key, cmp);
    }
  }

  /// Inserts or overwrites `key`, returns `true` if the number of live entries grew.
  pub(super) fn insert<C: Comparator<K>>(&mut self, key: K, value: V, cmp: &C) -> bool {
    let trace = self.trace(&key, cmp);

    if let Some(id) = self.next(trace[0], 0) {
      let node = &mut self.arena[id];
      if cmp.compare(&node.key, &key).is_eq() {
        node.value = value;
        if !node.tombstone {
          return false;
        }

        node.tombstone = false;
        self.len += 1;
        self.admit(id, cmp);
        return true;
      }
    }

    let level = self.levels.random();
    if level > self.level {
      #[cfg(feature = "tracing")]
      tracing::trace!(from = self.level, to = level, "skiplist grows");
      // trace[self.level + 1..=level] is still the header
      self.level = level;
    }

    let id = self.arena.insert(Node::new(key, value, level));
    for (i, pred) in trace.iter().copied().enumerate().take(level + 1) {
      let next = self.next(pred, i);
      self.arena[id].tower[i] = next;
      self.set_next(pred, i, Some(id));
    }

    self.len += 1;
    self.admit(id, cmp);
    true
  }

  /// Physically removes the node holding `key`, returns its value if it was live.
  pub(super) fn remove<C: Comparator<K>>(&mut self, key: &K, cmp: &C) -> Option<V> {
    let trace = self.trace(key, cmp);
    let id = self.next(trace[0], 0)?;
    if !cmp.compare(&self.arena[id].key, key).is_eq() {
      return None;
    }

    self
      .unlink(id, &trace, cmp)
      .filter(Node::is_live)
      .map(|node| node.value)
  }

  /// Unsplices `id` from every level its predecessors in `trace` link it on, and frees it.
  fn unlink<C: Comparator<K>>(
    &mut self,
    id: NodeId,
    trace: &[Option<NodeId>],
    cmp: &C,
  ) -> Option<Node<K, V>> {
    if self.arena[id].is_live() {
      self.retire(id, cmp);
    }

    for (level, pred) in trace.iter().copied().enumerate().take(self.arena[id].level() + 1) {
      // a node linked on `level` is linked on every level below it
      if self.next(pred, level) != Some(id) {
        break;
      }
      let next = self.arena[id].next(level);
      self.set_next(pred, level, next);
    }

    self.shrink();

    let node = self.arena.remove(id)?;
    if node.is_live() {
      self.len -= 1;
    }
    if node.recorded {
      if let Some(pos) = self.tombstones.iter().position(|t| *t == id) {
        self.tombstones.swap_remove(pos);
      }
    }
    Some(node)
  }

  fn shrink(&mut self) {
    let from = self.level;
    while self.level > 0 && self.head[self.level].is_none() {
      self.level -= 1;
    }

    #[cfg(feature = "tracing")]
    if from != self.level {
      tracing::trace!(from, to = self.level, "skiplist shrinks");
    }
    #[cfg(not(feature = "tracing"))]
    let _ = from;
  }

  /// Marks the node holding `key` as removed without unlinking it.
  pub(super) fn lazy_remove<C: Comparator<K>>(&mut self, key: &K, cmp: &C) -> bool {
    let Some(id) = self.find_live(key, cmp) else {
      return false;
    };

    self.retire(id, cmp);
    let node = &mut self.arena[id];
    node.tombstone = true;
    // a revived node keeps its record until the next sweep
    if !node.recorded {
      node.recorded = true;
      self.tombstones.push(id);
    }
    self.len -= 1;
    true
  }

  /// Unlinks every recorded tombstone that is still marked, returns how many were swept.
  pub(super) fn clean<C: Comparator<K>>(&mut self, cmp: &C) -> usize {
    let tombstones = core::mem::take(&mut self.tombstones);
    let mut swept = 0;
    for id in tombstones {
      // already removed eagerly
      let Some(node) = self.arena.get_mut(id) else {
        continue;
      };
      node.recorded = false;
      // revived since
      if !node.tombstone {
        continue;
      }
      let trace = self.trace(&self.arena[id].key, cmp);

      if self.unlink(id, &trace, cmp).is_some() {
        swept += 1;
      }
    }
    swept
  }

  pub(super) fn clear(&mut self) {
    self.arena.clear();
    self.head.fill(None);
    self.level = 0;
    self.len = 0;
    self.min = None;
    self.max = None;
    self.tombstones.clear();
  }

  /// Returns the number of live keys less than or equal to `key`.
  pub(super) fn rank<C: Comparator<K>>(&self, key: &K, cmp: &C) -> usize {
    let mut count = 0;
    let mut cur = self.first();
    while let Some(id) = cur {
      if cmp.compare(&self.arena[id].key, key).is_gt() {
        break;
      }
      count += 1;
      cur = self.step(id);
    }
    count
  }

  /// Returns the live node at 0-based position `rank`.
  pub(super) fn nth(&self, rank: usize) -> Option<NodeId> {
    if rank >= self.len {
      return None;
    }

    let mut cur = self.first();
    for _ in 0..rank {
      cur = self.step(cur?);
    }
    cur
  }

  /// Returns an appending cursor for [`push_back`](Inner::push_back), positioned on the header.
  #[inline]
  pub(super) fn tails(&self) -> Vec<Option<NodeId>> {
    vec![None; self.head.len()]
  }

  /// Appends a live node after every node linked so far, with a freshly sampled level.
  ///
  /// The caller guarantees `key` is greater than every key in the list and that `tails` was
  /// obtained from [`tails`](Inner::tails) on the empty list and only used with this list.
  pub(super) fn push_back(&mut self, tails: &mut [Option<NodeId>], key: K, value: V) {
    let level = self.levels.random();
    debug_assert!(level < self.levels.total());
    self.push_back_at(tails, key, value, level);
  }

  /// Like [`push_back`](Inner::push_back), keeping a level decided by the caller.
  pub(super) fn push_back_at(&mut self, tails: &mut [Option<NodeId>], key: K, value: V, level: usize) {
    let level = level.min(self.head.len() - 1);
    let id = self.arena.insert(Node::new(key, value, level));
    for (i, tail) in tails.iter_mut().enumerate().take(level + 1) {
      self.set_next(*tail, i, Some(id));
      *tail = Some(id);
    }

    self.level = self.level.max(level);
    if self.min.is_none() {
      self.min = Some(id);
    }
    self.max = Some(id);
    self.len += 1;
  }

  /// Moves every node with a key greater than or equal to `pivot` into a new list,
  /// keeping their levels. Tombstoned nodes in the moved tail are dropped.
  pub(super) fn split_off<C: Comparator<K>>(&mut self, pivot: &K, cmp: &C, opts: &Options) -> Self {
    let trace = self.trace(pivot, cmp);
    let mut cur = self.next(trace[0], 0);
    for (level, pred) in trace.iter().copied().enumerate().take(self.level + 1) {
      self.set_next(pred, level, None);
    }

    let mut out = Self::new(opts);
    out.levels = self.levels.fork();
    let mut tails = out.tails();
    while let Some(id) = cur {
      let Some(node) = self.arena.remove(id) else {
        break;
      };
      cur = node.next(0);
      if node.is_live() {
        self.len -= 1;
        let level = node.level();
        out.push_back_at(&mut tails, node.key, node.value, level);
      }
    }

    self.shrink();
    self.min = self.first();
    // every remaining key is below the pivot
    self.max = self.live_lt(pivot, cmp);
    let arena = &self.arena;
    self.tombstones.retain(|id| arena.get(*id).is_some());
    out
  }
}
