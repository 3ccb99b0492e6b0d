use std::sync::{Arc, Mutex};

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::{
    dsp::{chorus::StereoChorus, limiter::SoftKneeLimiter},
    engine::{
        config::EngineConfig,
        lock_shared,
        meter::{LevelAccumulator, Meters},
        SharedState,
    },
};

/*
Render Pipeline
===============

Per output buffer of N frames, holding the shared lock throughout:

    for each frame:
        mix      = Σ voice.next_sample()         (all voices in the pool)
        mix     *= master_gain
        limited  = soft_knee(mix)                → metering
        (l, r)   = chorus(limited)  or  (limited, limited)
        out[ch]  = clamp(l | r | limited, -1, 1)
    reclaim finished voices
    release lock, publish RMS/peak

The clamp after the chorus is a safety net: the limiter ceiling is 0.9667 and
the chorus is a convex blend, so in practice nothing reaches it.

Nothing here allocates. The chorus lines were sized at construction, the pool
only iterates and erases, and the scope tap drops samples when its ring is
full rather than growing.
*/

pub struct Renderer {
    shared: Arc<Mutex<SharedState>>,
    meters: Arc<Meters>,
    limiter: SoftKneeLimiter,
    chorus: StereoChorus,
    chorus_was_on: bool,
    sample_rate: f64,
    channels: usize,
    #[cfg(feature = "rtrb")]
    scope: Option<Producer<f32>>,
}

impl Renderer {
    pub(crate) fn new(
        shared: Arc<Mutex<SharedState>>,
        meters: Arc<Meters>,
        config: &EngineConfig,
    ) -> Self {
        let sample_rate = config.sample_rate as f64;
        Self {
            shared,
            meters,
            limiter: SoftKneeLimiter::default(),
            chorus: StereoChorus::new(sample_rate, config.chorus),
            chorus_was_on: false,
            sample_rate,
            channels: config.channels.max(1) as usize,
            #[cfg(feature = "rtrb")]
            scope: None,
        }
    }

    /// Also push every limited mono sample into `producer` for an
    /// oscilloscope. Samples are dropped while the ring is full.
    #[cfg(feature = "rtrb")]
    pub fn with_scope(mut self, producer: Producer<f32>) -> Self {
        self.scope = Some(producer);
        self
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Fill `out` with interleaved frames.
    ///
    /// Any trailing partial frame (`out.len() % channels` samples) is zeroed.
    pub fn render(&mut self, out: &mut [f32]) {
        let channels = self.channels;
        let frames = out.len() / channels;
        let (body, tail) = out.split_at_mut(frames * channels);
        tail.fill(0.0);

        let mut levels = LevelAccumulator::default();
        {
            let mut guard = lock_shared(&self.shared);
            let SharedState { pool, params } = &mut *guard;

            let gain = params.master_gain;
            let chorus_on = params.chorus && channels >= 2;
            if chorus_on && !self.chorus_was_on {
                // Don't replay whatever was in the lines the last time it ran.
                self.chorus.reset();
            }
            self.chorus_was_on = chorus_on;

            for frame in body.chunks_exact_mut(channels) {
                let mix = pool.mix_sample(self.sample_rate) * gain;
                let limited = self.limiter.process(mix);
                levels.add(limited);

                let (left, right) = if chorus_on {
                    self.chorus.process(limited)
                } else {
                    (limited, limited)
                };
                write_frame(frame, left, right, limited);

                #[cfg(feature = "rtrb")]
                {
                    if let Some(scope) = self.scope.as_mut() {
                        let _ = scope.push(limited as f32);
                    }
                }
            }

            // Same critical section as the mix: nothing is removed while it
            // could still be summed into this buffer.
            pool.reclaim();
        }

        self.meters.publish(levels.finish());
    }
}

/// Channel 0 gets left, channel 1 right, any further channels the mono bus.
#[inline]
fn write_frame(frame: &mut [f32], left: f64, right: f64, mono: f64) {
    for (ch, sample) in frame.iter_mut().enumerate() {
        let value = match ch {
            0 => left,
            1 => right,
            _ => mono,
        };
        *sample = value.clamp(-1.0, 1.0) as f32;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        control::{keymap::KeyMap, ControlEvent},
        engine::{config::EngineConfig, SynthEngine},
        synth::KeyId,
    };

    fn engine(channels: u16) -> SynthEngine {
        SynthEngine::new(EngineConfig {
            channels,
            ..EngineConfig::default()
        })
    }

    #[test]
    fn silent_pool_renders_zeros_and_zero_meters() {
        let engine = engine(2);
        let mut renderer = engine.renderer();
        let mut out = vec![1.0f32; 512];
        renderer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(engine.meters().peak(), 0.0);
        assert_eq!(engine.meters().rms(), 0.0);
    }

    #[test]
    fn dry_output_duplicates_mono_to_every_channel() {
        let engine = engine(4);
        let control = engine.control(KeyMap::qwerty());
        let mut renderer = engine.renderer();
        control.handle(ControlEvent::key_down('a'));

        let mut out = vec![0.0f32; 4 * 256];
        renderer.render(&mut out);
        for frame in out.chunks_exact(4) {
            assert!(frame.iter().all(|&s| s == frame[0]));
        }
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn partial_trailing_frame_is_zeroed() {
        let engine = engine(2);
        let control = engine.control(KeyMap::qwerty());
        let mut renderer = engine.renderer();
        control.handle(ControlEvent::key_down('h'));
        let mut out = vec![0.5f32; 2 * 100 + 1];
        renderer.render(&mut out);
        assert_eq!(out[200], 0.0);
    }

    #[test]
    fn chorus_splits_stereo_channels() {
        let engine = engine(2);
        let control = engine.control(KeyMap::qwerty());
        let mut renderer = engine.renderer();
        control.handle(ControlEvent::ToggleChorus);
        control.handle(ControlEvent::key_down('g'));

        let mut out = vec![0.0f32; 2 * 4_410];
        renderer.render(&mut out);
        assert!(out.chunks_exact(2).any(|f| (f[0] - f[1]).abs() > 1e-4));
    }

    fn render_mono(chorus: bool) -> Vec<f32> {
        let engine = engine(1);
        let control = engine.control(KeyMap::qwerty());
        let mut renderer = engine.renderer();
        if chorus {
            control.handle(ControlEvent::ToggleChorus);
        }
        control.handle(ControlEvent::key_down('g'));
        let mut out = vec![0.0f32; 4_410];
        renderer.render(&mut out);
        out
    }

    #[test]
    fn chorus_is_bypassed_for_mono_output() {
        assert_eq!(render_mono(true), render_mono(false));
    }

    #[test]
    fn meters_reflect_last_buffer() {
        let engine = engine(2);
        let control = engine.control(KeyMap::qwerty());
        let mut renderer = engine.renderer();
        control.handle(ControlEvent::key_down('h'));

        let mut out = vec![0.0f32; 2 * 4_410];
        renderer.render(&mut out);
        let peak = engine.meters().peak();
        let rms = engine.meters().rms();
        let observed = out.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak > 0.0 && rms > 0.0 && rms <= peak);
        assert!((peak - observed).abs() < 1e-6);
    }

    #[test]
    fn finished_voices_are_reclaimed_at_buffer_end() {
        let engine = engine(2);
        let control = engine.control(KeyMap::qwerty());
        let mut renderer = engine.renderer();
        let mut out = vec![0.0f32; 2 * 512];

        control.handle(ControlEvent::key_down('a'));
        renderer.render(&mut out);
        control.handle(ControlEvent::key_up('a'));
        // Releasing from near full level takes ~9300 samples; 20 buffers cover it.
        for _ in 0..20 {
            renderer.render(&mut out);
        }
        assert_eq!(control.snapshot().voices, 0);
        assert_eq!(control.key_state(KeyId::from('a')), crate::KeyState::Off);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn scope_tap_receives_mono_bus() {
        let engine = engine(2);
        let control = engine.control(KeyMap::qwerty());
        let (producer, mut consumer) = rtrb::RingBuffer::<f32>::new(128);
        let mut renderer = engine.renderer().with_scope(producer);
        control.handle(ControlEvent::key_down('a'));

        let mut out = vec![0.0f32; 2 * 256];
        renderer.render(&mut out);

        // Ring holds 128; the rest were dropped without blocking.
        let mut tapped = Vec::new();
        while let Ok(s) = consumer.pop() {
            tapped.push(s);
        }
        assert_eq!(tapped.len(), 128);
        for (i, s) in tapped.iter().enumerate() {
            assert_eq!(*s, out[i * 2]);
        }
    }
}
