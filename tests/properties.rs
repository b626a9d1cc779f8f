use std::collections::BTreeMap;

use proptest::prelude::*;
use rwskl::{Options, SkipList};

#[derive(Debug, Clone)]
enum Op {
  Insert(i16, u32),
  Remove(i16),
  LazyRemove(i16),
  Clean,
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    4 => (any::<i16>(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k % 512, v)),
    2 => any::<i16>().prop_map(|k| Op::Remove(k % 512)),
    2 => any::<i16>().prop_map(|k| Op::LazyRemove(k % 512)),
    1 => Just(Op::Clean),
  ]
}

fn options() -> impl Strategy<Value = Options> {
  (1usize..=20, 1u32..10, any::<u64>()).prop_map(|(max_level, p, seed)| {
    Options::new()
      .with_max_level(max_level)
      .with_probability(p as f64 / 10.0)
      .with_seed(seed)
  })
}

fn pairs(l: &SkipList<i16, u32>) -> Vec<(i16, u32)> {
  l.iter().map(Into::into).collect()
}

fn apply(l: &SkipList<i16, u32>, oracle: &mut BTreeMap<i16, u32>, op: &Op) {
  match *op {
    Op::Insert(k, v) => {
      let grew = l.insert(k, v);
      assert_eq!(grew, oracle.insert(k, v).is_none());
    }
    Op::Remove(k) => assert_eq!(l.remove(&k), oracle.remove(&k)),
    Op::LazyRemove(k) => assert_eq!(l.lazy_remove(&k), oracle.remove(&k).is_some()),
    Op::Clean => {
      l.clean();
      assert_eq!(l.pending_tombstones(), 0);
    }
  }
}

proptest! {
  #[test]
  fn prop_matches_btreemap(opts in options(), ops in prop::collection::vec(op(), 0..400)) {
    let l = SkipList::with_options(opts).unwrap();
    let mut oracle = BTreeMap::new();

    for op in &ops {
      apply(&l, &mut oracle, op);
      prop_assert_eq!(l.len(), oracle.len());
      prop_assert!(l.level() < opts.max_level());
    }

    let expected: Vec<_> = oracle.iter().map(|(k, v)| (*k, *v)).collect();
    prop_assert_eq!(pairs(&l), expected.clone());
    prop_assert_eq!(l.to_vec().into_iter().map(Into::into).collect::<Vec<(i16, u32)>>(), expected);
    prop_assert_eq!(l.min().map(|e| *e.key()), oracle.keys().next().copied());
    prop_assert_eq!(l.max().map(|e| *e.key()), oracle.keys().next_back().copied());

    for k in -520i16..520 {
      prop_assert_eq!(l.get(&k), oracle.get(&k).copied());
    }

    // sweeping never changes what is visible
    l.clean();
    prop_assert_eq!(pairs(&l), oracle.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());
  }

  #[test]
  fn prop_reverse_iteration(keys in prop::collection::vec(any::<i16>(), 0..300)) {
    let l = SkipList::new().unwrap();
    l.insert_all(keys.iter().map(|k| (*k, 0u32)));

    let mut it = l.iter_from_end();
    let mut backward = Vec::new();
    while let Some(ent) = it.prev() {
      backward.push(*ent.key());
    }
    backward.reverse();

    let forward: Vec<_> = l.iter().map(|e| *e.key()).collect();
    prop_assert_eq!(backward, forward);
  }

  #[test]
  fn prop_range(keys in prop::collection::vec(-100i16..100, 0..200), a in -110i16..110, b in -110i16..110) {
    let l = SkipList::new().unwrap();
    let mut oracle = BTreeMap::new();
    for k in keys {
      l.insert(k, 0u32);
      oracle.insert(k, 0u32);
    }

    let got: Vec<_> = l.range(a..b).map(|e| *e.key()).collect();
    let expected: Vec<_> = oracle.keys().copied().filter(|k| a <= *k && *k < b).collect();
    prop_assert_eq!(&got, &expected);

    let got: Vec<_> = l.range(a..=b).map(|e| *e.key()).collect();
    let expected: Vec<_> = oracle.keys().copied().filter(|k| a <= *k && *k <= b).collect();
    prop_assert_eq!(got, expected);
  }

  #[test]
  fn prop_merge(
    left in prop::collection::btree_map(-200i16..200, any::<u32>(), 0..150),
    right in prop::collection::btree_map(-200i16..200, any::<u32>(), 0..150),
  ) {
    let a = SkipList::new().unwrap();
    a.insert_all(left.clone());
    let b = SkipList::new().unwrap();
    b.insert_all(right.clone());

    let mut expected = left;
    expected.extend(right);

    let m = SkipList::merge(&a, &b).unwrap();
    prop_assert_eq!(m.len(), expected.len());
    prop_assert_eq!(pairs(&m), expected.into_iter().collect::<Vec<_>>());
  }

  #[test]
  fn prop_rank_select(keys in prop::collection::btree_set(any::<i16>(), 0..200), probe in any::<i16>()) {
    let l = SkipList::new().unwrap();
    l.insert_all(keys.iter().map(|k| (*k, 0u32)));

    let sorted: Vec<_> = keys.iter().copied().collect();
    prop_assert_eq!(l.rank(&probe), sorted.iter().filter(|k| **k <= probe).count());
    for (i, k) in sorted.iter().enumerate() {
      prop_assert_eq!(l.select(i).map(|e| *e.key()), Some(*k));
    }
    prop_assert!(l.select(sorted.len()).is_none());
  }

  #[test]
  fn prop_split_off(keys in prop::collection::btree_set(-300i16..300, 0..200), pivot in -310i16..310) {
    let l = SkipList::new().unwrap();
    l.insert_all(keys.iter().map(|k| (*k, 0u32)));

    let upper = l.split_off(&pivot);
    let low: Vec<_> = l.iter().map(|e| *e.key()).collect();
    let high: Vec<_> = upper.iter().map(|e| *e.key()).collect();
    prop_assert_eq!(low, keys.iter().copied().filter(|k| *k < pivot).collect::<Vec<_>>());
    prop_assert_eq!(high, keys.iter().copied().filter(|k| *k >= pivot).collect::<Vec<_>>());
  }
}
