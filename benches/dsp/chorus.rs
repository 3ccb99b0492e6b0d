//! Benchmarks for the stereo chorus (two LFO-swept interpolated taps).

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::chorus::{ChorusSettings, StereoChorus};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_chorus(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/chorus");

    for &size in BLOCK_SIZES {
        let mut chorus = StereoChorus::new(SAMPLE_RATE, ChorusSettings::default());
        let input: Vec<f64> = (0..size)
            .map(|i| (i as f64 * 0.05).sin() * 0.5)
            .collect();
        let mut output = vec![(0.0f64, 0.0f64); size];

        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in output.iter_mut().zip(black_box(&input)) {
                    *out = chorus.process(x);
                }
                black_box(&output);
            })
        });
    }

    group.finish();
}
