//! Low Frequency Oscillator (LFO) used to sweep chorus delay times.

use std::f64::consts::TAU;

/*
Low Frequency Oscillators
=========================

An LFO is simply an oscillator running at sub-audio frequencies. The same
sine math as an audio oscillator applies, but the output is used to move a
parameter over time rather than being heard directly.

  audio-rate      ~20 Hz to ~20,000 Hz. Produces the sound you hear.

  control-rate    ~0.01 Hz to ~20 Hz. Modulates other parameters.

  bipolar         Output swings -1.0 to +1.0. A chorus wants bipolar
                  modulation so the delay moves both above and below its
                  base time.

The chorus runs two of these at slightly different rates (0.8 Hz and
1.2 Hz). Because the ratio is 2:3 the two channels only line up every 2.5
seconds, which keeps the stereo image moving instead of pulsing in lockstep.

Each LFO owns its phase. There is no shared or static state, so two render
pipelines in the same process never disturb each other.
*/

#[derive(Debug, Clone, Copy)]
pub struct SineLfo {
    phase: f64,
    rate_hz: f64,
}

impl SineLfo {
    pub fn new(rate_hz: f64) -> Self {
        Self {
            phase: 0.0,
            rate_hz: rate_hz.max(0.0),
        }
    }

    /// Current bipolar value, then advance one sample.
    #[inline]
    pub fn next_value(&mut self, sample_rate: f64) -> f64 {
        let value = self.phase.sin();
        self.phase += TAU * self.rate_hz / sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        value
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn rate(&self) -> f64 {
        self.rate_hz
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
