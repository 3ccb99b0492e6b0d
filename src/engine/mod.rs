//! Shared state and the two sides that touch it.
//!
//! A [`SynthEngine`] owns the voice pool and global parameters behind a single
//! mutex and hands out the two handles that use them:
//!
//! - [`Renderer`]: moved into the audio callback. Locks once per buffer for
//!   the whole mix + reclaim pass.
//! - [`ControlSurface`]: stays on the input thread. Locks once per event.
//!
//! Metering bypasses the lock entirely through [`Meters`].
//!
//! Teardown: stop the audio stream first (dropping the `Renderer`), then drop
//! the engine and control surface.

pub mod config;
pub mod meter;
pub mod render;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    control::{keymap::KeyMap, ControlSurface},
    synth::{params::SynthParams, pool::VoicePool},
};

pub use config::EngineConfig;
pub use meter::{MeterReading, Meters};
pub use render::Renderer;

/// Everything both threads mutate, guarded by one lock.
pub struct SharedState {
    pub pool: VoicePool,
    pub params: SynthParams,
}

/// Lock the shared state, recovering it if a previous holder panicked.
///
/// The state is plain data that is valid after any partial update, so a
/// poisoned lock is safe to keep using, and the audio thread must never panic
/// on it.
pub(crate) fn lock_shared(shared: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SynthEngine {
    shared: Arc<Mutex<SharedState>>,
    meters: Arc<Meters>,
    config: EngineConfig,
}

impl SynthEngine {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.sanitized();
        let shared = SharedState {
            pool: VoicePool::new(config.envelope, config.amplitude),
            params: config.params,
        };

        tracing::info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            buffer_frames = config.buffer_frames,
            "synth engine created"
        );

        Self {
            shared: Arc::new(Mutex::new(shared)),
            meters: Arc::new(Meters::default()),
            config,
        }
    }

    /// Render side. Owns its own chorus state; move it into the audio callback.
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.shared.clone(), self.meters.clone(), &self.config)
    }

    /// Input side, mapping key identifiers through `keymap`.
    pub fn control(&self, keymap: KeyMap) -> ControlSurface {
        ControlSurface::new(
            self.shared.clone(),
            self.meters.clone(),
            keymap,
            self.config.sample_rate as f64,
        )
    }

    pub fn meters(&self) -> Arc<Meters> {
        self.meters.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for SynthEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
