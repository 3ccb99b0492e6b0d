//! Input side of the engine.
//!
//! A [`ControlSurface`] turns discrete [`ControlEvent`]s into voice-pool and
//! parameter mutations, one short critical section per event, and assembles
//! [`DisplaySnapshot`]s for whatever is drawing the UI.

pub mod keymap;

use std::sync::{Arc, Mutex};

use crate::{
    dsp::oscillator::Waveform,
    engine::{lock_shared, MeterReading, Meters, SharedState},
    synth::{pool::KeyState, KeyId},
    MIN_PITCH_HZ,
};

pub use crate::synth::message::{ControlEvent, KeyAction};
pub use keymap::KeyMap;

/// Whether the input loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One mapped key as the display sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeySnapshot {
    pub id: KeyId,
    pub pitch_hz: f64,
    pub state: KeyState,
}

/// Everything a UI frame needs, copied out under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    pub master_gain: f64,
    pub octave: i32,
    pub waveform: Waveform,
    pub chorus: bool,
    /// Mapped keys, lowest pitch first
    pub keys: Vec<KeySnapshot>,
    /// Voices still in the pool (held or decaying)
    pub voices: usize,
    pub meters: MeterReading,
}

pub struct ControlSurface {
    shared: Arc<Mutex<SharedState>>,
    meters: Arc<Meters>,
    keymap: KeyMap,
    sample_rate: f64,
}

impl ControlSurface {
    pub(crate) fn new(
        shared: Arc<Mutex<SharedState>>,
        meters: Arc<Meters>,
        keymap: KeyMap,
        sample_rate: f64,
    ) -> Self {
        Self {
            shared,
            meters,
            keymap,
            sample_rate,
        }
    }

    /// Apply one event. Every outcome is total: out-of-range requests clamp
    /// and unmapped keys do nothing.
    pub fn handle(&self, event: ControlEvent) -> Flow {
        if event == ControlEvent::Quit {
            return Flow::Quit;
        }

        let mut guard = lock_shared(&self.shared);
        let SharedState { pool, params } = &mut *guard;

        match event {
            ControlEvent::Key {
                id,
                action: KeyAction::Down,
            } => {
                if let Some(base) = self.keymap.pitch(id) {
                    // Bound the transposed pitch, not just the base.
                    let highest_base = self.nyquist() / 2.0_f64.powi(params.octave);
                    let base = base.clamp(MIN_PITCH_HZ, highest_base.max(MIN_PITCH_HZ));
                    pool.note_on(id, base, params.octave, params.waveform, self.sample_rate);
                }
            }
            ControlEvent::Key {
                id,
                action: KeyAction::Up,
            } => pool.note_off(id),
            ControlEvent::OctaveUp => {
                params.shift_octave(1);
                tracing::debug!(octave = params.octave, "octave changed");
            }
            ControlEvent::OctaveDown => {
                params.shift_octave(-1);
                tracing::debug!(octave = params.octave, "octave changed");
            }
            ControlEvent::GainUp => {
                params.step_gain(1);
                tracing::debug!(gain = params.master_gain, "master gain changed");
            }
            ControlEvent::GainDown => {
                params.step_gain(-1);
                tracing::debug!(gain = params.master_gain, "master gain changed");
            }
            ControlEvent::SelectWaveform(waveform) => {
                params.waveform = waveform;
                tracing::debug!(%waveform, "waveform selected");
            }
            ControlEvent::ToggleChorus => {
                params.toggle_chorus();
                tracing::debug!(chorus = params.chorus, "chorus toggled");
            }
            ControlEvent::AllNotesOff => {
                pool.release_all();
                tracing::debug!(voices = pool.len(), "all notes off");
            }
            ControlEvent::Quit => {}
        }

        Flow::Continue
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let guard = lock_shared(&self.shared);
        let keys = self
            .keymap
            .by_pitch()
            .into_iter()
            .map(|(id, pitch_hz)| KeySnapshot {
                id,
                pitch_hz,
                state: guard.pool.key_state(id),
            })
            .collect();

        DisplaySnapshot {
            master_gain: guard.params.master_gain,
            octave: guard.params.octave,
            waveform: guard.params.waveform,
            chorus: guard.params.chorus,
            keys,
            voices: guard.pool.len(),
            meters: self.meters.reading(),
        }
    }

    pub fn key_state(&self, id: KeyId) -> KeyState {
        lock_shared(&self.shared).pool.key_state(id)
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }
}
