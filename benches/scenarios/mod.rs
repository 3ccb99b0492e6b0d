//! Real-world scenario benchmarks.
//!
//! Whole output buffers through the engine, lock and all, with the kind of
//! chords a player actually holds.

mod render;

pub use render::bench_render;
