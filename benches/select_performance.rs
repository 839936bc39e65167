use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tophn::select::select;
use tophn::store::samples::{self, Sample, WINDOW_SECS};
use tempfile::TempDir;

const NOW: i64 = 1_700_000_000;

/// One sample per `step` seconds across a full window, rotating through
/// `distinct` ids in runs so counts differ the way real rankings do.
fn window(step: i64, distinct: u64) -> Vec<Sample> {
    let count = WINDOW_SECS / step;
    (0..count)
        .map(|i| {
            let run = (i / 30) as u64;
            Sample::new(1_000 + run % distinct, NOW - WINDOW_SECS + 1 + i * step)
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    // minute polling gives 1440 samples per window; second polling 86400
    for (label, step) in [("per_minute", 60), ("per_second", 1)] {
        for distinct in [5u64, 200] {
            let samples = window(step, distinct);
            group.bench_with_input(
                BenchmarkId::new(label, distinct),
                &samples,
                |b, samples| b.iter(|| select(black_box(samples))),
            );
        }
    }

    group.finish();
}

fn bench_record(c: &mut Criterion) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("ids.json");
    let seed = window(60, 20);

    c.bench_function("record_full_window", |b| {
        b.iter_batched(
            || samples::save_window(&path, &seed).expect("failed to seed store"),
            |()| samples::record(black_box(&path), Sample::new(1_000, NOW), NOW),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_select, bench_record);
criterion_main!(benches);
