use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io;
use std::sync::Arc;
use tagged_throttle::{hash, AdmissionPipeline, CallSite, ThrottleLedger, ThrottleMode, WriterSink};

/// Benchmark the call-site hash
fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    group.bench_function("short_site", |b| b.iter(|| hash(black_box("main.c:42"))));

    group.bench_function("long_site", |b| {
        b.iter(|| hash(black_box("drivers/sensors/accelerometer_calibration.c:1234")))
    });

    group.finish();
}

/// Benchmark ledger decisions for one hot site and for a ledger under eviction
fn bench_ledger(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");
    group.throughput(Throughput::Elements(1000));

    for mode in [ThrottleMode::Count, ThrottleMode::Interval] {
        group.bench_with_input(
            BenchmarkId::new("single_site", format!("{mode:?}")),
            &mode,
            |b, &mode| {
                let mut ledger = ThrottleLedger::new(10, mode);
                b.iter(|| {
                    for ms in 0..1000u32 {
                        black_box(ledger.admit("main.c", 42, 10, black_box(ms)).ok());
                    }
                })
            },
        );
    }

    // More sites than slots: every call opens a record and evicts one
    group.bench_function("thrashing", |b| {
        let mut ledger = ThrottleLedger::new(10, ThrottleMode::Count);
        b.iter(|| {
            for line in 0..1000u16 {
                black_box(ledger.admit("main.c", line % 16, 10, 0).ok());
            }
        })
    });

    group.finish();
}

/// Benchmark full pipeline checks
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1000));

    let pipeline = AdmissionPipeline::builder()
        .with_sink(Arc::new(WriterSink::new(io::sink())))
        .build()
        .unwrap();

    group.bench_function("unthrottled", |b| {
        let call = CallSite::new("MAIN", "main.c", 42);
        b.iter(|| {
            for _ in 0..1000 {
                black_box(pipeline.check(black_box(&call)));
            }
        })
    });

    group.bench_function("throttled", |b| {
        let call = CallSite::new("MAIN", "main.c", 43).with_rate(5);
        b.iter(|| {
            for _ in 0..1000 {
                black_box(pipeline.check(black_box(&call)));
            }
        })
    });

    group.bench_function("excluded", |b| {
        let call = CallSite::new("!MAIN", "main.c", 44).with_rate(5);
        b.iter(|| {
            for _ in 0..1000 {
                black_box(pipeline.check(black_box(&call)));
            }
        })
    });

    group.finish();
}

/// Benchmark contention on a shared pipeline
fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");

    for num_threads in [2u16, 4, 8].iter() {
        group.throughput(Throughput::Elements(u64::from(*num_threads) * 1000));

        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let pipeline = Arc::new(
                        AdmissionPipeline::builder()
                            .with_sink(Arc::new(WriterSink::new(io::sink())))
                            .build()
                            .unwrap(),
                    );

                    let mut handles = vec![];
                    for i in 0..num_threads {
                        let pipeline = Arc::clone(&pipeline);
                        handles.push(std::thread::spawn(move || {
                            let call = CallSite::new("T", "worker.c", i).with_rate(50);
                            for _ in 0..1000 {
                                black_box(pipeline.check(&call));
                            }
                        }));
                    }

                    for handle in handles {
                        handle.join().unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_hash, bench_ledger, bench_pipeline, bench_concurrent);
criterion_main!(benches);
