//! Benchmarks for `Renderer::render` at increasing polyphony.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keysynth::{ControlEvent, EngineConfig, KeyMap, SynthEngine, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const QWERTY_KEYS: &str = "awsedftgyhuj";

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    for &size in BLOCK_SIZES {
        for (voices, chorus) in [(1, false), (4, false), (12, false), (12, true)] {
            let engine = SynthEngine::new(EngineConfig {
                sample_rate: SAMPLE_RATE as u32,
                channels: 2,
                buffer_frames: size as u32,
                ..EngineConfig::default()
            });
            let control = engine.control(KeyMap::qwerty());
            let mut renderer = engine.renderer();
            control.handle(ControlEvent::SelectWaveform(Waveform::Saw));
            if chorus {
                control.handle(ControlEvent::ToggleChorus);
            }
            for key in QWERTY_KEYS.chars().take(voices) {
                control.handle(ControlEvent::key_down(key));
            }

            let mut buffer = vec![0.0f32; size * 2];
            let name = if chorus {
                format!("{voices}_voices_chorus")
            } else {
                format!("{voices}_voices")
            };
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| renderer.render(black_box(&mut buffer)))
            });
        }
    }

    group.finish();
}
