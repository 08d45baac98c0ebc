//! Basic insert/remove/successor throughput, here to quickly catch
//! regressions rather than to pin down absolute numbers.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::SliceRandom;
use rand::{thread_rng, Rng};

use prbtree::PersistentRbTree;

const TREE_SIZES: [u64; 4] = [1 << 8, 1 << 12, 1 << 16, 1 << 18];

fn gen_keys(n: u64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n as i64).collect();
    keys.shuffle(&mut thread_rng());
    keys
}

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("fresh_tree", |b| {
        let mut rng = thread_rng();
        b.iter(|| {
            let mut tree = PersistentRbTree::new();
            for _ in 0..256 {
                tree.insert(rng.gen_range(0..1 << 20));
            }
            criterion::black_box(tree.current_version());
        })
    });
    group.finish();
}

pub fn sequential_insert_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential_insert");
    for size in TREE_SIZES {
        let keys = gen_keys(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = PersistentRbTree::new();
                for &k in keys {
                    tree.insert(k);
                }
                criterion::black_box(tree.current_version());
            })
        });
    }
    group.finish();
}

pub fn successor_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("successor_lookup");
    let keys = gen_keys(1 << 16);
    let mut tree = PersistentRbTree::new();
    for &k in &keys {
        tree.insert(k);
    }
    let v = tree.current_version() as i64;
    group.throughput(Throughput::Elements(1));
    group.bench_function("mid_history", |b| {
        let mut rng = thread_rng();
        b.iter(|| {
            let probe = rng.gen_range(0..1 << 16);
            criterion::black_box(tree.successor(probe, v).unwrap());
        })
    });
    group.finish();
}

pub fn old_version_in_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("old_version_in_order");
    let mut tree = PersistentRbTree::new();
    let keys = gen_keys(1 << 12);
    for &k in &keys {
        tree.insert(k);
    }
    let midpoint = (tree.current_version() / 2) as i64;
    group.bench_function("dump_midpoint_version", |b| {
        b.iter(|| criterion::black_box(tree.in_order(midpoint).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    rand_insert,
    sequential_insert_by_size,
    successor_lookup,
    old_version_in_order
);
criterion_main!(benches);
