use chain_table::{hash_from_data, Table};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

// Digest-shaped keys: 32 hex chars.
fn key(n: u64) -> String {
    format!("{:016x}{:016x}", n, n.rotate_left(17))
}

fn filled(seed: u64, n: usize, capacity: usize) -> (Table, Vec<String>) {
    let mut t = Table::new(capacity).unwrap();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.insert(k, i as i64).unwrap();
    }
    (t, keys)
}

fn bench_hash(c: &mut Criterion) {
    let k = key(42);
    c.bench_function("hash::fnv_32_bytes", |b| {
        b.iter(|| black_box(hash_from_data(black_box(k.as_bytes()))))
    });
}

fn bench_insert(c: &mut Criterion) {
    for capacity in [0usize, 64] {
        let name = format!("table::insert_fresh_10k_cap{capacity}");
        c.bench_function(&name, |b| {
            b.iter_batched(
                || Table::new(capacity).unwrap(),
                |mut t| {
                    for (i, x) in lcg(1).take(10_000).enumerate() {
                        t.insert(&key(x), i as i64).unwrap();
                    }
                    black_box(t)
                },
                BatchSize::SmallInput,
            )
        });
    }

    c.bench_function("table::upsert_existing_10k", |b| {
        b.iter_batched(
            || filled(3, 10_000, 0),
            |(mut t, keys)| {
                for k in &keys {
                    t.insert(k, "/updated/path").unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_search(c: &mut Criterion) {
    let (t, keys) = filled(7, 10_000, 0);
    let mut s = 0x9e3779b97f4a7c15u64;
    let queries: Vec<&String> = (0..10_000)
        .map(|_| {
            s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
            &keys[(s as usize) % keys.len()]
        })
        .collect();
    c.bench_function("table::search_hit_10k", |b| {
        b.iter(|| {
            for k in &queries {
                black_box(t.search(k));
            }
        })
    });

    let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
    c.bench_function("table::search_miss_10k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(t.search(k));
            }
        })
    });
}

fn bench_remove(c: &mut Criterion) {
    c.bench_function("table::remove_all_10k", |b| {
        b.iter_batched(
            || filled(5, 10_000, 0),
            |(mut t, keys)| {
                for k in &keys {
                    t.remove(k);
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_format(c: &mut Criterion) {
    let (t, _) = filled(999, 10_000, 0);
    c.bench_function("table::format_10k", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(512 * 1024);
            t.format(&mut out).unwrap();
            black_box(out)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_build;
    config = bench_config();
    targets = bench_hash, bench_insert
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_search, bench_remove, bench_format
}
criterion_main!(benches_build, benches_ops);
