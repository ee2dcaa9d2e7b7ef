//! Benchmark: marquee wraparound and scroll folding.
//!
//! Run with: `cargo bench -p drift-core --bench wrap_bench`
//!
//! Every strip wraps its offset once per frame, so the common case (one step
//! or none) must stay in the low nanoseconds. The backgrounded-tab case
//! (thousands of cycles of accumulated delta) exercises the remainder path.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use drift_core::wrap::{fold_into_cycle, wrap_offset};

fn bench_wrap_offset(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap_offset");

    for (label, offset) in [
        ("in_range", -120.0),
        ("one_step", -312.5),
        ("positive", 14.0),
        ("backgrounded", -3.6e6),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &offset, |b, &offset| {
            b.iter(|| black_box(wrap_offset(black_box(offset), black_box(300.0))));
        });
    }

    group.finish();
}

fn bench_fold_into_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_into_cycle");

    for (label, position) in [("idle", 640.0), ("past_cycle", 1020.0), ("far", 9.0e9)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &position,
            |b, &position| {
                b.iter(|| black_box(fold_into_cycle(black_box(position), black_box(1000.0))));
            },
        );
    }

    group.finish();
}

/// A page of 40 strips ticking at 60 Hz for one second.
fn bench_frame_of_strips(c: &mut Criterion) {
    let widths: Vec<f64> = (0..40).map(|i| 900.0 + f64::from(i) * 37.0).collect();
    c.bench_function("wrap_40_strips_60_frames", |b| {
        b.iter(|| {
            let mut offsets = vec![0.0_f64; widths.len()];
            for _ in 0..60 {
                for (offset, width) in offsets.iter_mut().zip(&widths) {
                    *offset = wrap_offset(*offset - width / 12.0 / 60.0, *width);
                }
            }
            black_box(offsets)
        });
    });
}

criterion_group!(
    benches,
    bench_wrap_offset,
    bench_fold_into_cycle,
    bench_frame_of_strips
);
criterion_main!(benches);
