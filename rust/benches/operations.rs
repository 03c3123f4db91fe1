use bplusmulti::BPlusMultiMap;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, SeedableRng};

const SIZE: usize = 10_000;

fn shuffled_keys(unique: usize, copies: usize) -> Vec<i32> {
    let mut keys: Vec<i32> = (0..unique as i32)
        .flat_map(|k| std::iter::repeat(k).take(copies))
        .collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn populated(order: usize, keys: &[i32]) -> BPlusMultiMap<i32, i32> {
    let mut tree = BPlusMultiMap::new(order).unwrap();
    for (i, &key) in keys.iter().enumerate() {
        tree.insert(key, i as i32);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for (name, unique, copies) in [
        ("distinct_keys", SIZE, 1),
        ("ten_per_key", SIZE / 10, 10),
        ("duplicate_heavy", SIZE / 100, 100),
    ] {
        let keys = shuffled_keys(unique, copies);
        group.bench_with_input(BenchmarkId::new(name, SIZE), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = BPlusMultiMap::new(64).unwrap();
                for (i, &key) in keys.iter().enumerate() {
                    tree.insert(black_box(key), i as i32);
                }
                tree
            });
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for (name, unique, copies) in [("distinct_keys", SIZE, 1), ("duplicate_heavy", SIZE / 100, 100)]
    {
        let keys = shuffled_keys(unique, copies);
        let tree = populated(64, &keys);
        group.bench_function(BenchmarkId::new(name, SIZE), |b| {
            b.iter(|| {
                for key in 0..unique as i32 {
                    black_box(tree.search(&key));
                }
            });
        });
    }
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    group.sample_size(20);
    for (name, unique, copies) in [("distinct_keys", SIZE, 1), ("duplicate_heavy", SIZE / 100, 100)]
    {
        let keys = shuffled_keys(unique, copies);
        group.bench_function(BenchmarkId::new(name, SIZE), |b| {
            b.iter_batched(
                || populated(64, &keys),
                |mut tree| {
                    for &key in &keys {
                        black_box(tree.delete(&key));
                    }
                    tree
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_iteration(c: &mut Criterion) {
    let keys = shuffled_keys(SIZE / 10, 10);
    let tree = populated(64, &keys);
    c.bench_function("iterate_all", |b| {
        b.iter(|| {
            let mut total = 0i64;
            for (_, v) in tree.items() {
                total += *v as i64;
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, bench_insert, bench_search, bench_delete, bench_iteration);
criterion_main!(benches);
