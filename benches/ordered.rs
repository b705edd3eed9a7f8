use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ferrous_di_ordered::*;
use std::sync::Arc;

fn descriptors(count: usize) -> Arc<OrderedDescriptors<u64>> {
    let mut builder = OrderedDescriptors::<u64>::builder();
    for i in 0..count as u64 {
        if i % 2 == 0 {
            builder.add_value(i);
        } else {
            builder.add_factory(move |_| Ok(Arc::new(i)));
        }
    }
    builder.build()
}

// ===== Micro Benchmarks =====

fn bench_materialized_iteration(c: &mut Criterion) {
    let sp = ServiceCollection::new().build();
    let ordered = sp.ordered(descriptors(16));

    // Prime the cache
    let _ = ordered.iter().unwrap();

    c.bench_function("ordered_iter_hit_16", |b| {
        b.iter(|| {
            let sum: u64 = ordered.iter().unwrap().map(|v| *v).sum();
            black_box(sum);
        })
    });
}

fn bench_cold_materialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_cold");

    for &count in &[1, 16, 256] {
        let container = descriptors(count);
        let sp = ServiceCollection::new().build();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter_batched(
                || sp.ordered(container.clone()),
                |ordered| {
                    black_box(ordered.len().unwrap());
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let sp = ServiceCollection::new().build();
    let ordered = sp.ordered(descriptors(16));
    let _ = ordered.iter().unwrap();

    for &thread_count in &[1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("ordered_threads", thread_count),
            &thread_count,
            |b, &threads| {
                b.iter_custom(|iters| {
                    let start = std::time::Instant::now();
                    crossbeam_utils::thread::scope(|s| {
                        for _ in 0..threads {
                            let ordered_ref = &ordered;
                            s.spawn(move |_| {
                                for _ in 0..iters / threads as u64 {
                                    let v = ordered_ref.iter().unwrap();
                                    black_box(v.len());
                                }
                            });
                        }
                    })
                    .unwrap();
                    start.elapsed()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    micro_benches,
    bench_materialized_iteration,
    bench_cold_materialization,
    bench_contention
);

criterion_main!(micro_benches);
