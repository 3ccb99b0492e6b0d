//! Benchmarks for low-level DSP primitives.

mod chorus;
mod envelope;
mod limiter;
mod oscillator;

pub use chorus::bench_chorus;
pub use envelope::bench_envelope;
pub use limiter::bench_limiter;
pub use oscillator::bench_oscillator;
