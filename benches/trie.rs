//! Benchmarks for trie construction, traversal and lookup.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use packtrie::{
    encode_trie, find, for_each_with_values, read_trie, CodingParams, TrieEntry, TrieSymbol,
    U32ValueList,
};

/// Dense four-symbol keys sharing long prefixes (place-name-like shape).
fn make_entries(count: u32) -> Vec<TrieEntry<u32>> {
    (0..count)
        .map(|i| {
            let key = vec![i / 1000 % 10, i / 100 % 10, i / 10 % 10, i % 10];
            TrieEntry::new(key, i)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for count in [100u32, 1000, 10000] {
        let entries = make_entries(count);
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("dense", count), &count, |bench, _| {
            bench.iter(|| encode_trie::<U32ValueList>(black_box(&entries), CodingParams::default()))
        });
    }

    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for count in [100u32, 1000, 10000] {
        let entries = make_entries(count);
        let bytes = encode_trie::<U32ValueList>(&entries, CodingParams::default()).unwrap();

        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("dense", count), &count, |bench, _| {
            bench.iter(|| {
                let root =
                    read_trie::<U32ValueList>(black_box(&bytes), CodingParams::default()).unwrap();
                let mut total = 0u64;
                for_each_with_values(&root, &mut |_: &[TrieSymbol], values: &U32ValueList| {
                    total += values.len() as u64;
                })
                .unwrap();
                total
            })
        });
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    let entries = make_entries(10000);
    let bytes = encode_trie::<U32ValueList>(&entries, CodingParams::default()).unwrap();
    let root = read_trie::<U32ValueList>(&bytes, CodingParams::default()).unwrap();
    let probes: Vec<Vec<TrieSymbol>> = entries.iter().step_by(97).map(|e| e.key.clone()).collect();

    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("point_lookup", |bench| {
        bench.iter(|| {
            let mut hits = 0u64;
            for probe in &probes {
                if find(black_box(&root), probe).unwrap().is_some() {
                    hits += 1;
                }
            }
            hits
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_walk, bench_find);
criterion_main!(benches);
