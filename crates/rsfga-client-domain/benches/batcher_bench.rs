//! Benchmarks for change set construction and chunking.
//!
//! Run with: cargo bench -p rsfga-client-domain

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rsfga_client_domain::{Batcher, Tuple, TupleChangeSet};

fn make_change_set(writes: usize, deletes: usize) -> TupleChangeSet {
    let writes = (0..writes)
        .map(|i| Tuple::new(format!("user:w{i}"), "viewer", format!("document:{i}")))
        .collect();
    let deletes = (0..deletes)
        .map(|i| Tuple::new(format!("user:d{i}"), "editor", format!("document:{i}")))
        .collect();
    TupleChangeSet::new(writes, deletes).expect("bench change set is valid")
}

fn bench_change_set_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_set_new");
    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(make_change_set(size / 2, size / 2)));
        });
    }
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let batcher = Batcher::default();
    let mut group = c.benchmark_group("batcher_split");
    for size in [100usize, 1_000, 10_000] {
        let change_set = make_change_set(size / 2, size / 2);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &change_set,
            |b, change_set| {
                b.iter(|| black_box(batcher.split(black_box(change_set))));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_change_set_validation, bench_split);
criterion_main!(benches);
