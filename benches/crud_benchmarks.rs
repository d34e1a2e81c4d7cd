use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use redblack::{RbMap, RbSet, RbTree};
use std::collections::{BTreeMap, BTreeSet};
use std::hint::black_box;

const N: usize = 10_000;

// ─── Key sequences ──────────────────────────────────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Deterministic LCG so runs are comparable.
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn patterns() -> [(&'static str, Vec<i64>); 3] {
    [("ordered", ordered_keys(N)), ("reverse", reverse_ordered_keys(N)), ("random", random_keys(N))]
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("map_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("RbMap", N), |b| {
            b.iter(|| keys.iter().map(|&k| (k, k)).collect::<RbMap<_, _>>());
        });
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| keys.iter().map(|&k| (k, k)).collect::<BTreeMap<_, _>>());
        });

        group.finish();
    }
}

fn bench_map_get(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let rb_map: RbMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        let mut group = c.benchmark_group(format!("map_get_{pattern}"));

        group.bench_function(BenchmarkId::new("RbMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| rb_map.get(black_box(k))).sum::<i64>());
        });
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| keys.iter().filter_map(|k| bt_map.get(black_box(k))).sum::<i64>());
        });

        group.finish();
    }
}

fn bench_map_remove(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let rb_map: RbMap<i64, i64> = ordered_keys(N).into_iter().map(|k| (k, k)).collect();
        let bt_map: BTreeMap<i64, i64> = ordered_keys(N).into_iter().map(|k| (k, k)).collect();
        let mut group = c.benchmark_group(format!("map_remove_{pattern}"));

        group.bench_function(BenchmarkId::new("RbMap", N), |b| {
            b.iter_batched(
                || rb_map.clone(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || bt_map.clone(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.finish();
    }
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert(c: &mut Criterion) {
    for (pattern, keys) in patterns() {
        let mut group = c.benchmark_group(format!("set_insert_{pattern}"));

        group.bench_function(BenchmarkId::new("RbSet", N), |b| {
            b.iter(|| keys.iter().copied().collect::<RbSet<_>>());
        });
        group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
            b.iter(|| keys.iter().copied().collect::<BTreeSet<_>>());
        });

        group.finish();
    }
}

fn bench_set_pop_first(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_set: RbSet<i64> = keys.iter().copied().collect();
    let bt_set: BTreeSet<i64> = keys.iter().copied().collect();
    let mut group = c.benchmark_group("set_pop_first");

    group.bench_function(BenchmarkId::new("RbSet", N), |b| {
        b.iter_batched(
            || rb_set.clone(),
            |mut set| while set.pop_first().is_some() {},
            criterion::BatchSize::LargeInput,
        );
    });
    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || bt_set.clone(),
            |mut set| while set.pop_first().is_some() {},
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Tree Benchmarks ────────────────────────────────────────────────────────

fn bench_tree_find_then_insert(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("tree_find_then_insert");

    group.bench_function(BenchmarkId::new("insert_at", N), |b| {
        b.iter(|| {
            let mut tree: RbTree<i64> = RbTree::with_capacity(N);
            for &k in &keys {
                let at = tree.find(&k);
                if !at.is_match() {
                    let _ = tree.insert_at(at, k);
                }
            }
            tree
        });
    });
    group.bench_function(BenchmarkId::new("insert", N), |b| {
        b.iter(|| {
            let mut tree: RbTree<i64> = RbTree::with_capacity(N);
            for &k in &keys {
                tree.insert(k);
            }
            tree
        });
    });

    group.finish();
}

criterion_group!(map_benches, bench_map_insert, bench_map_get, bench_map_remove);

criterion_group!(set_benches, bench_set_insert, bench_set_pop_first);

criterion_group!(tree_benches, bench_tree_find_then_insert);

criterion_main!(map_benches, set_benches, tree_benches);
