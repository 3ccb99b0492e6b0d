//! Low-level DSP primitives used by the voices and the render pipeline.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to drive from inside the audio callback. They stay focused
//! on the signal-processing math; voice management and locking live in
//! `synth` and `engine`.

/// Stereo modulated-delay chorus.
pub mod chorus;
/// Fixed-length circular delay line with fractional reads.
pub mod delay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Sine LFO used to sweep the chorus delay.
pub mod lfo;
/// Cubic soft-knee limiter.
pub mod limiter;
/// Band-unlimited oscillator waveforms with loudness correction.
pub mod oscillator;

pub use envelope::{EnvelopeSettings, EnvelopeStage};
