use crate::arena::NodeId;

/// A node of the skiplist. Owned by the arena of its list, linked to its successors by id.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
  pub(crate) key: K,
  pub(crate) value: V,
  /// `tower[i]` is the successor at level `i`, the tower spans levels `0..=level`.
  pub(crate) tower: Box<[Option<NodeId>]>,
  /// Logically deleted, still linked until the next sweep.
  pub(crate) tombstone: bool,
  /// Already listed in the tombstones of its list.
  pub(crate) recorded: bool,
}

impl<K, V> Node<K, V> {
  #[inline]
  pub(crate) fn new(key: K, value: V, level: usize) -> Self {
    Self {
      key,
      value,
      tower: vec![None; level + 1].into_boxed_slice(),
      tombstone: false,
      recorded: false,
    }
  }

  /// Returns the highest level this node is linked into.
  #[inline]
  pub(crate) fn level(&self) -> usize {
    self.tower.len() - 1
  }

  #[inline]
  pub(crate) fn next(&self, level: usize) -> Option<NodeId> {
    self.tower[level]
  }

  #[inline]
  pub(crate) fn is_live(&self) -> bool {
    !self.tombstone
  }
}
