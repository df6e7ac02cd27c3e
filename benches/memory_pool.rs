//! Storage arena benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use node_buffer::config::BufferConfig;
use node_buffer::memory::{AllocStrategy, StorageArena};
use std::sync::Arc;

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    let arena = StorageArena::new(BufferConfig::default().with_mmap_threshold(1 << 20)).unwrap();

    for size in [16, 256, 2048, 8192] {
        group.throughput(Throughput::Elements(1));
        for (name, strategy) in [
            ("default", AllocStrategy::Default),
            ("dedicated", AllocStrategy::Dedicated),
            ("zeroed", AllocStrategy::Zeroed),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let buf = arena.allocate(size, strategy).expect("allocation failed");
                    std::hint::black_box(buf.len());
                });
            });
        }
    }

    group.finish();
}

fn bench_mapped(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapped");
    let arena = StorageArena::new(BufferConfig::default().with_mmap_threshold(64 * 1024)).unwrap();

    group.throughput(Throughput::Elements(1));
    group.bench_function("map_unmap_1mb", |b| {
        b.iter(|| {
            let buf = arena.alloc(1 << 20).expect("mapping failed");
            std::hint::black_box(buf.kind());
        });
    });

    group.finish();
}

fn bench_pool_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_concurrent");
    let arena = Arc::new(StorageArena::new(BufferConfig::default()).unwrap());

    group.throughput(Throughput::Elements(400));
    group.bench_function("4_threads_100_allocs_each", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let arena = Arc::clone(&arena);
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            if let Ok(buf) = arena.alloc_unsafe(64) {
                                std::hint::black_box(buf.byte_offset());
                            }
                        }
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_allocate, bench_mapped, bench_pool_concurrent);
criterion_main!(benches);
