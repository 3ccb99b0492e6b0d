pub mod control; // Input events -> pool/parameter mutations
pub mod dsp;
pub mod engine; // Shared state, render pipeline, metering
pub mod synth; // Voices and the identifier-keyed pool

pub use control::{
    ControlEvent, ControlSurface, DisplaySnapshot, Flow, KeyAction, KeyMap, KeySnapshot,
};
pub use dsp::oscillator::Waveform;
pub use engine::{
    config::EngineConfig,
    meter::{MeterReading, Meters},
    render::Renderer,
    SynthEngine,
};
pub use synth::{pool::KeyState, voice::Voice, KeyId};

/// Lowest pitch a key can be mapped to, in Hz.
pub const MIN_PITCH_HZ: f64 = 8.0;
/// Fixed attenuation applied to every voice to leave mixing room before the limiter.
pub const HEADROOM: f64 = 0.9;
