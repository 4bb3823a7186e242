use chained_table::hash::{djb2, fnv1a, xxh64};
use chained_table::ChainedTable;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn bench_insert_grow_from_one_100k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(1).take(100_000).map(key).collect();
    c.bench_function("chained::insert_grow_from_one_100k", |b| {
        b.iter_batched(
            || ChainedTable::<u64, _>::with_hasher(1, xxh64),
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.insert(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized_100k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(2).take(100_000).map(key).collect();
    c.bench_function("chained::insert_presized_100k", |b| {
        b.iter_batched(
            || ChainedTable::<u64, _>::with_hasher(262_144, xxh64),
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.insert(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit_by_hasher(c: &mut Criterion) {
    let keys: Vec<String> = lcg(7).take(100_000).map(key).collect();
    let mut group = c.benchmark_group("chained::get_hit_100k");
    macro_rules! case {
        ($name:literal, $h:expr) => {
            let mut t = ChainedTable::with_hasher(16, $h);
            for (i, k) in keys.iter().enumerate() {
                t.insert(k, i as u64).unwrap();
            }
            group.bench_function($name, |b| {
                b.iter(|| {
                    for k in &keys {
                        black_box(t.get(k));
                    }
                })
            });
        };
    }
    case!("djb2", djb2);
    case!("fnv1a", fnv1a);
    case!("xxh64", xxh64);
    group.finish();
}

fn bench_get_miss_100k(c: &mut Criterion) {
    let mut t = ChainedTable::with_hasher(16, xxh64);
    for (i, x) in lcg(11).take(100_000).enumerate() {
        t.insert(&key(x), i as u64).unwrap();
    }
    let misses: Vec<String> = lcg(0xdead_beef).take(100_000).map(key).collect();
    c.bench_function("chained::get_miss_100k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(t.get(k));
            }
        })
    });
}

fn bench_delete_all_100k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(5).take(100_000).map(key).collect();
    c.bench_function("chained::delete_all_100k", |b| {
        b.iter_batched(
            || {
                let mut t = ChainedTable::with_hasher(16, xxh64);
                for (i, k) in keys.iter().enumerate() {
                    t.insert(k, i as u64).unwrap();
                }
                t
            },
            |mut t| {
                for k in &keys {
                    black_box(t.delete(k));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn config() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
}

criterion_group! {
    name = benches;
    config = config();
    targets =
        bench_insert_grow_from_one_100k,
        bench_insert_presized_100k,
        bench_get_hit_by_hasher,
        bench_get_miss_100k,
        bench_delete_all_100k
}
criterion_main!(benches);
