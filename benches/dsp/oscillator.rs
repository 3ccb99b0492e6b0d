//! Benchmarks for a single voice: phase accumulator plus waveform.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{Voice, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        for waveform in Waveform::ALL {
            let mut voice = Voice::default();
            voice.trigger(440.0, SAMPLE_RATE, waveform);
            let id = format!("{}/{size}", waveform.name().to_lowercase());
            group.bench_function(BenchmarkId::from_parameter(id), |b| {
                b.iter(|| {
                    let mut acc = 0.0;
                    for _ in 0..size {
                        acc += voice.next_sample(black_box(SAMPLE_RATE));
                    }
                    black_box(acc)
                })
            });
        }
    }

    group.finish();
}
