#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;

pub const MIN_OCTAVE: i32 = -3;
pub const MAX_OCTAVE: i32 = 3;
/// Amount one gain up/down event moves the master gain.
pub const GAIN_STEP: f64 = 0.05;

/// Global synthesis parameters mutated by the control surface and read by the
/// render pipeline once per buffer.
///
/// Every setter clamps; nothing here can fail.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Master gain (0.0 - 1.0)
    pub master_gain: f64,
    /// Octave transposition for new notes (-3 to +3)
    pub octave: i32,
    /// Waveform given to newly triggered voices
    pub waveform: Waveform,
    /// Stereo chorus on the output bus
    pub chorus: bool,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            master_gain: 0.5,
            octave: 0,
            waveform: Waveform::Sine,
            chorus: false,
        }
    }
}

impl SynthParams {
    pub fn sanitized(self) -> Self {
        let mut params = self;
        params.set_gain(self.master_gain);
        params.set_octave(self.octave);
        params
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.master_gain = if gain.is_finite() {
            gain.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Step the gain by `steps` increments of [`GAIN_STEP`].
    pub fn step_gain(&mut self, steps: i32) {
        let stepped = self.master_gain + GAIN_STEP * steps as f64;
        // Snap to the step grid so repeated presses don't accumulate drift.
        self.set_gain((stepped / GAIN_STEP).round() * GAIN_STEP);
    }

    pub fn set_octave(&mut self, octave: i32) {
        self.octave = octave.clamp(MIN_OCTAVE, MAX_OCTAVE);
    }

    pub fn shift_octave(&mut self, delta: i32) {
        self.set_octave(self.octave.saturating_add(delta));
    }

    pub fn toggle_chorus(&mut self) {
        self.chorus = !self.chorus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_steps_clamp_at_both_ends() {
        let mut params = SynthParams::default();
        for _ in 0..30 {
            params.step_gain(1);
        }
        assert_eq!(params.master_gain, 1.0);
        for _ in 0..30 {
            params.step_gain(-1);
        }
        assert_eq!(params.master_gain, 0.0);
    }

    #[test]
    fn gain_stays_on_step_grid() {
        let mut params = SynthParams::default();
        for _ in 0..7 {
            params.step_gain(-1);
        }
        assert!((params.master_gain - 0.15).abs() < 1e-12);
    }

    #[test]
    fn octave_clamps_to_three() {
        let mut params = SynthParams::default();
        for _ in 0..10 {
            params.shift_octave(1);
        }
        assert_eq!(params.octave, MAX_OCTAVE);
        params.shift_octave(-100);
        assert_eq!(params.octave, MIN_OCTAVE);
    }

    #[test]
    fn sanitized_repairs_loaded_values() {
        let params = SynthParams {
            master_gain: 7.0,
            octave: -9,
            ..SynthParams::default()
        }
        .sanitized();
        assert_eq!(params.master_gain, 1.0);
        assert_eq!(params.octave, -3);
    }
}
