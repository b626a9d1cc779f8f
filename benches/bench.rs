use criterion::*;
use parking_lot::RwLock;
use rand::prelude::*;
use rwskl::SkipList;
use std::{
  collections::*,
  sync::{atomic::*, *},
  thread,
};

fn random_key(rng: &mut ThreadRng) -> Vec<u8> {
  let mut key = vec![0; 16];
  rng.fill_bytes(&mut key);
  key
}

fn skiplist_round(l: &SkipList<Vec<u8>, Vec<u8>>, case: &(Vec<u8>, bool), exp: &Vec<u8>) {
  if case.1 {
    if let Some(v) = l.get(&case.0) {
      assert_eq!(&v, exp);
    }
  } else {
    l.insert(case.0.clone(), exp.clone());
  }
}

fn map_round(m: &RwLock<BTreeMap<Vec<u8>, Vec<u8>>>, case: &(Vec<u8>, bool), exp: &Vec<u8>) {
  if case.1 {
    if let Some(v) = m.read().get(&case.0) {
      assert_eq!(v, exp);
    }
  } else {
    m.write().insert(case.0.clone(), exp.clone());
  }
}

fn bench_read_write_skiplist_frac(b: &mut Bencher<'_>, frac: &usize) {
  let frac = *frac;
  let value = b"00123".to_vec();
  let list = Arc::new(SkipList::new().unwrap());
  let l = list.clone();
  let stop = Arc::new(AtomicBool::new(false));
  let s = stop.clone();
  let v = value.clone();
  let j = thread::spawn(move || {
    let mut rng = rand::rng();
    while !s.load(Ordering::SeqCst) {
      let key = random_key(&mut rng);
      let case = (key, frac > rng.random_range(0..11));
      skiplist_round(&l, &case, &v);
    }
  });
  let mut rng = rand::rng();
  b.iter_batched_ref(
    || (random_key(&mut rng), frac > rng.random_range(0..11)),
    |case| skiplist_round(&list, case, &value),
    BatchSize::SmallInput,
  );
  stop.store(true, Ordering::SeqCst);
  j.join().unwrap();
}

fn bench_read_write_skiplist(c: &mut Criterion) {
  let mut group = c.benchmark_group("skiplist_read_write");
  for i in 0..=10 {
    group.bench_with_input(
      BenchmarkId::from_parameter(i),
      &i,
      bench_read_write_skiplist_frac,
    );
  }
  group.finish();
}

fn bench_read_write_map_frac(b: &mut Bencher<'_>, frac: &usize) {
  let frac = *frac;
  let value = b"00123".to_vec();
  let map = Arc::new(RwLock::new(BTreeMap::new()));
  let m = map.clone();
  let stop = Arc::new(AtomicBool::new(false));
  let s = stop.clone();

  let v = value.clone();
  let h = thread::spawn(move || {
    let mut rng = rand::rng();
    while !s.load(Ordering::SeqCst) {
      let f = rng.random_range(0..11);
      let case = (random_key(&mut rng), f < frac);
      map_round(&m, &case, &v);
    }
  });
  let mut rng = rand::rng();
  b.iter_batched_ref(
    || {
      let f = rng.random_range(0..11);
      (random_key(&mut rng), f < frac)
    },
    |case| map_round(&map, case, &value),
    BatchSize::SmallInput,
  );
  stop.store(true, Ordering::SeqCst);
  h.join().unwrap();
}

fn bench_read_write_map(c: &mut Criterion) {
  let mut group = c.benchmark_group("btreemap_read_write");
  for i in 0..=10 {
    group.bench_with_input(
      BenchmarkId::from_parameter(i),
      &i,
      bench_read_write_map_frac,
    );
  }
  group.finish();
}

fn bench_write_sequential(c: &mut Criterion) {
  const N: u64 = 10_000;
  c.bench_function("skiplist_write_sequential", |b| {
    b.iter_batched(
      || SkipList::<u64, u64>::new().unwrap(),
      |l| {
        for i in 0..N {
          l.insert(i, i);
        }
        l
      },
      BatchSize::LargeInput,
    )
  });
}

fn bench_iterate(c: &mut Criterion) {
  const N: u64 = 10_000;
  let l = SkipList::<u64, u64>::new().unwrap();
  l.insert_all((0..N).map(|i| (i, i)));

  c.bench_function("skiplist_iterate", |b| {
    b.iter(|| black_box(l.iter().count()))
  });
  c.bench_function("skiplist_iterate_back", |b| {
    b.iter(|| {
      let mut it = l.iter_from_end();
      let mut n = 0;
      while it.prev().is_some() {
        n += 1;
      }
      black_box(n)
    })
  });
}

fn bench_merge(c: &mut Criterion) {
  const N: u64 = 10_000;
  let a = SkipList::<u64, u64>::new().unwrap();
  a.insert_all((0..N).map(|i| (i * 2, i)));
  let b = SkipList::<u64, u64>::new().unwrap();
  b.insert_all((0..N).map(|i| (i * 3, i)));

  c.bench_function("skiplist_merge", |bench| {
    bench.iter(|| black_box(SkipList::merge(&a, &b).unwrap()))
  });
}

criterion_group!(
  benches,
  bench_read_write_skiplist,
  bench_read_write_map,
  bench_write_sequential,
  bench_iterate,
  bench_merge,
);
criterion_main!(benches);
