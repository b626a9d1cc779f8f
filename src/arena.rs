use core::ops::{Index, IndexMut};

/// A stable handle to a slot of an [`Arena`].
///
/// The generation is bumped every time the slot is freed, so a handle that outlived its
/// node never resolves to whatever the slot holds next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
  index: usize,
  generation: u32,
}

#[derive(Debug, Clone)]
enum Slot<T> {
  Occupied { generation: u32, value: T },
  Vacant { generation: u32, next_free: Option<usize> },
}

/// A generational slot arena. Freed slots are recycled through an intrusive freelist.
#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
  slots: Vec<Slot<T>>,
  free_head: Option<usize>,
  len: usize,
}

impl<T> Arena<T> {
  #[inline]
  pub(crate) const fn new() -> Self {
    Self {
      slots: Vec::new(),
      free_head: None,
      len: 0,
    }
  }

  /// Returns the number of occupied slots.
  #[inline]
  pub(crate) const fn len(&self) -> usize {
    self.len
  }

  pub(crate) fn insert(&mut self, value: T) -> NodeId {
    self.len += 1;
    match self.free_head {
      Some(index) => {
        let generation = match self.slots[index] {
          Slot::Vacant {
            generation,
            next_free,
          } => {
            self.free_head = next_free;
            generation
          }
          Slot::Occupied { .. } => unreachable!("freelist points to an occupied slot"),
        };
        self.slots[index] = Slot::Occupied { generation, value };
        NodeId { index, generation }
      }
      None => {
        let index = self.slots.len();
        self.slots.push(Slot::Occupied {
          generation: 0,
          value,
        });
        NodeId {
          index,
          generation: 0,
        }
      }
    }
  }

  #[inline]
  pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
    match self.slots.get(id.index) {
      Some(Slot::Occupied { generation, value }) if *generation == id.generation => Some(value),
      _ => None,
    }
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
    match self.slots.get_mut(id.index) {
      Some(Slot::Occupied { generation, value }) if *generation == id.generation => Some(value),
      _ => None,
    }
  }

  /// Frees the slot of `id` and returns its value, or `None` if `id` is stale.
  pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
    match self.slots.get(id.index) {
      Some(Slot::Occupied { generation, .. }) if *generation == id.generation => {}
      _ => return None,
    }

    let vacant = Slot::Vacant {
      generation: id.generation.wrapping_add(1),
      next_free: self.free_head,
    };
    self.free_head = Some(id.index);
    self.len -= 1;
    match core::mem::replace(&mut self.slots[id.index], vacant) {
      Slot::Occupied { value, .. } => Some(value),
      Slot::Vacant { .. } => None,
    }
  }

  /// Frees every slot. Ids handed out before the call all become stale.
  pub(crate) fn clear(&mut self) {
    self.free_head = None;
    for (index, slot) in self.slots.iter_mut().enumerate().rev() {
      let generation = match slot {
        Slot::Occupied { generation, .. } => generation.wrapping_add(1),
        Slot::Vacant { generation, .. } => *generation,
      };
      *slot = Slot::Vacant {
        generation,
        next_free: self.free_head,
      };
      self.free_head = Some(index);
    }
    self.len = 0;
  }
}

impl<T> Index<NodeId> for Arena<T> {
  type Output = T;

  #[inline]
  fn index(&self, id: NodeId) -> &T {
    match self.get(id) {
      Some(value) => value,
      None => panic!("dangling node id {id:?}"),
    }
  }
}

impl<T> IndexMut<NodeId> for Arena<T> {
  #[inline]
  fn index_mut(&mut self, id: NodeId) -> &mut T {
    match self.get_mut(id) {
      Some(value) => value,
      None => panic!("dangling node id {id:?}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_insert_get_remove() {
    let mut arena = Arena::new();
    let a = arena.insert("a");
    let b = arena.insert("b");
    assert_eq!(arena.len(), 2);
    assert_eq!(arena[a], "a");
    assert_eq!(arena.get(b), Some(&"b"));

    assert_eq!(arena.remove(a), Some("a"));
    assert_eq!(arena.remove(a), None);
    assert_eq!(arena.get(a), None);
    assert_eq!(arena.len(), 1);
  }

  #[test]
  fn test_recycled_slot_rejects_stale_id() {
    let mut arena = Arena::new();
    let a = arena.insert(1);
    arena.remove(a);
    let c = arena.insert(3);

    assert_eq!(a.index, c.index);
    assert_ne!(a, c);
    assert_eq!(arena.get(a), None);
    assert_eq!(arena[c], 3);
  }

  #[test]
  fn test_clear() {
    let mut arena = Arena::new();
    let ids: Vec<_> = (0..8).map(|i| arena.insert(i)).collect();
    arena.clear();
    assert_eq!(arena.len(), 0);
    for id in &ids {
      assert!(arena.get(*id).is_none());
    }

    // slots are reused from the front of the freelist
    let id = arena.insert(42);
    assert_eq!(id.index, 0);
    assert_eq!(arena[id], 42);
  }

  #[test]
  #[should_panic]
  fn test_index_dangling() {
    let mut arena = Arena::new();
    let a = arena.insert(1);
    arena.remove(a);
    let _ = arena[a];
  }
}
