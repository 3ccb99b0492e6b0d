#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{chorus::ChorusSettings, envelope::EnvelopeSettings},
    synth::{params::SynthParams, voice::DEFAULT_AMPLITUDE},
};

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 384_000;
pub const MAX_CHANNELS: u16 = 32;
pub const MIN_BUFFER_FRAMES: u32 = 16;
pub const MAX_BUFFER_FRAMES: u32 = 8_192;

/// Startup configuration. Sample rate, channel count, and buffer size are
/// fixed for the lifetime of the engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Frames per render callback requested from the device
    pub buffer_frames: u32,
    pub envelope: EnvelopeSettings,
    pub chorus: ChorusSettings,
    /// Per-voice gain before headroom
    pub amplitude: f64,
    /// Initial gain, octave, waveform, and chorus flag
    pub params: SynthParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            buffer_frames: 512,
            envelope: EnvelopeSettings::default(),
            chorus: ChorusSettings::default(),
            amplitude: DEFAULT_AMPLITUDE,
            params: SynthParams::default(),
        }
    }
}

impl EngineConfig {
    /// Clamp every field into its supported range.
    pub fn sanitized(&self) -> Self {
        Self {
            sample_rate: self.sample_rate.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE),
            channels: self.channels.clamp(1, MAX_CHANNELS),
            buffer_frames: self.buffer_frames.clamp(MIN_BUFFER_FRAMES, MAX_BUFFER_FRAMES),
            envelope: self.envelope.sanitized(),
            chorus: self.chorus.sanitized(),
            amplitude: if self.amplitude.is_finite() {
                self.amplitude.clamp(0.0, 1.0)
            } else {
                DEFAULT_AMPLITUDE
            },
            params: self.params.sanitized(),
        }
    }
}
