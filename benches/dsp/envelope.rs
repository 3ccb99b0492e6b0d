//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::dsp::envelope::{Envelope, EnvelopeSettings};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn run(env: &mut Envelope, size: usize) -> f64 {
    let mut acc = 0.0;
    for _ in 0..size {
        acc += env.next_sample(black_box(SAMPLE_RATE));
    }
    acc
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Attack phase (ramping up)
        let mut env = Envelope::new(EnvelopeSettings::new(10.0, 0.1, 0.7, 0.3));
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &size| {
            b.iter(|| black_box(run(&mut env, size)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new(EnvelopeSettings::new(0.001, 0.001, 0.7, 0.3));
        env.note_on();
        run(&mut env, 200);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| black_box(run(&mut env, size)))
        });

        // Release phase (ramping down); long enough that most iterations stay in it
        let mut env = Envelope::new(EnvelopeSettings::new(0.001, 0.001, 0.7, 60.0));
        env.note_on();
        run(&mut env, 200);
        env.note_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| black_box(run(&mut env, size)))
        });
    }

    group.finish();
}
