use crate::dsp::{delay::DelayLine, lfo::SineLfo};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Stereo Chorus
=============

Chorus thickens a sound by mixing the dry signal with a slightly delayed,
pitch-modulated copy. As the delay time sweeps, the copy is pitched a hair up
and down, which mimics several players on the same part.

How It Works
------------

1. The mono input is written into two delay lines (left/right) at a shared
   write cursor.
2. Each channel has its own LFO sweeping its delay around the base time:

       delay_ms = base_delay_ms + depth_ms · sin(lfo_phase)

3. Each channel reads back at `cursor - delay_samples`, interpolating between
   the two nearest stored samples, because the swept delay is almost never a
   whole number of samples.
4. Dry and wet are blended with weights that sum to one:

       out = dry · input + wet · delayed        dry = 1 - wet

5. The cursor advances one slot per frame and wraps.

Using different LFO rates for left and right (0.8 Hz vs 1.2 Hz) decorrelates
the channels and produces the stereo width.

Parameters
----------

Base Delay (~18 ms):
  The centre of the sweep. Too short: comb filtering. Too long: slapback.

Depth (~6 ms):
  How far the delay swings either side of the base. Clamped to the base delay
  so the read never overtakes the write.

Wet (~0.35):
  Blend of the delayed copy. 0.3-0.35 reads as chorus; above 0.5 it starts to
  sound like vibrato.

Buffer Sizing
-------------

Each line is allocated once, at construction, long enough for the deepest
possible read:

    len = ceil(sample_rate · (base + depth) / 1000) + 2

and is never resized, so processing a frame never allocates.
*/

/// Chorus tuning, fixed for the lifetime of a render pipeline.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusSettings {
    /// Left LFO speed in Hz
    pub rate_left_hz: f64,
    /// Right LFO speed in Hz
    pub rate_right_hz: f64,
    /// Centre delay in milliseconds
    pub base_delay_ms: f64,
    /// Sweep either side of the centre, in milliseconds
    pub depth_ms: f64,
    /// Delayed-copy weight; dry is `1 - wet`
    pub wet: f64,
}

impl Default for ChorusSettings {
    fn default() -> Self {
        Self {
            rate_left_hz: 0.8,
            rate_right_hz: 1.2,
            base_delay_ms: 18.0,
            depth_ms: 6.0,
            wet: 0.35,
        }
    }
}

impl ChorusSettings {
    pub fn sanitized(self) -> Self {
        let non_negative = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let base_delay_ms = non_negative(self.base_delay_ms);
        Self {
            rate_left_hz: non_negative(self.rate_left_hz),
            rate_right_hz: non_negative(self.rate_right_hz),
            base_delay_ms,
            depth_ms: non_negative(self.depth_ms).min(base_delay_ms),
            wet: if self.wet.is_finite() {
                self.wet.clamp(0.0, 1.0)
            } else {
                Self::default().wet
            },
        }
    }

    pub fn dry(&self) -> f64 {
        1.0 - self.wet
    }
}

pub struct StereoChorus {
    left: DelayLine,
    right: DelayLine,
    cursor: usize,
    lfo_left: SineLfo,
    lfo_right: SineLfo,
    settings: ChorusSettings,
    sample_rate: f64,
}

impl StereoChorus {
    pub fn new(sample_rate: f64, settings: ChorusSettings) -> Self {
        let settings = settings.sanitized();
        let max_delay_ms = settings.base_delay_ms + settings.depth_ms;
        let len = (sample_rate * max_delay_ms / 1000.0).ceil() as usize + 2;

        Self {
            left: DelayLine::new(len),
            right: DelayLine::new(len),
            cursor: 0,
            lfo_left: SineLfo::new(settings.rate_left_hz),
            lfo_right: SineLfo::new(settings.rate_right_hz),
            settings,
            sample_rate,
        }
    }

    #[inline]
    fn delay_samples(&self, lfo_value: f64) -> f64 {
        let delay_ms = self.settings.base_delay_ms + self.settings.depth_ms * lfo_value;
        delay_ms * self.sample_rate / 1000.0
    }

    /// Process one mono frame into a (left, right) pair.
    #[inline]
    pub fn process(&mut self, input: f64) -> (f64, f64) {
        self.left.write(self.cursor, input);
        self.right.write(self.cursor, input);

        let lfo_l = self.lfo_left.next_value(self.sample_rate);
        let lfo_r = self.lfo_right.next_value(self.sample_rate);
        let delay_l = self.delay_samples(lfo_l);
        let delay_r = self.delay_samples(lfo_r);
        let tap_l = self.left.read_interpolated(self.cursor, delay_l);
        let tap_r = self.right.read_interpolated(self.cursor, delay_r);

        self.cursor = (self.cursor + 1) % self.left.len();

        let dry = self.settings.dry() * input;
        let wet = self.settings.wet;
        (dry + wet * tap_l, dry + wet * tap_r)
    }

    /// Silence both lines and restart the LFOs.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.cursor = 0;
        self.lfo_left.reset();
        self.lfo_right.reset();
    }

    /// Length of each delay line in samples.
    pub fn line_len(&self) -> usize {
        self.left.len()
    }

    pub fn settings(&self) -> &ChorusSettings {
        &self.settings
    }
}
