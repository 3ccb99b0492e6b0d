//! Benchmarks for the soft-knee limiter, below and inside the knee.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::limiter::SoftKneeLimiter;

use crate::BLOCK_SIZES;

pub fn bench_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/limiter");
    let limiter = SoftKneeLimiter::default();

    for &size in BLOCK_SIZES {
        // Ramp from silence to 1.5: crosses the threshold and saturates
        let input: Vec<f64> = (0..size).map(|i| 1.5 * i as f64 / size as f64).collect();
        let mut output = vec![0.0f64; size];

        group.bench_with_input(BenchmarkId::new("ramp", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in output.iter_mut().zip(black_box(&input)) {
                    *out = limiter.process(x);
                }
                black_box(&output);
            })
        });
    }

    group.finish();
}
