#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, TAU};
use std::fmt;

/*
Oscillator Waveforms
====================

Each waveform is a pure function of phase (radians, 0 to 2π). The voice owns
the phase accumulator; this module only turns a phase into a sample.

    Sine      sin(φ)
    Square    +1 when sin(φ) ≥ 0, else -1
    Triangle  4·|t - ⌊t + ½⌋| - 1          t = φ / 2π
    Saw       2·(t - ⌊t + ½⌋)              t = φ / 2π

None of these are band-limited. At the keyboard's pitch range the aliasing of
square and saw is audible but tolerable.


Equal-Loudness Correction
-------------------------

At equal peak amplitude the four shapes carry very different energy:

    shape      RMS       gain to match sine RMS (1/√2)
    sine       1/√2      1
    square     1         1/√2
    triangle   1/√3      √1.5
    saw        1/√3      √1.5

Multiplying by `gain()` keeps the RMS constant when the player switches
waveform, so changing timbre never produces a jump in loudness. The triangle
and saw gains push their peaks above 1.0 (≈1.22); the voice headroom and the
limiter absorb that.
*/

/// Waveform selection for newly triggered voices.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Saw,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Saw,
    ];

    /// Raw waveform value at `phase`, in `[-1, 1]`.
    #[inline]
    pub fn sample(self, phase: f64) -> f64 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => {
                let t = phase / TAU;
                4.0 * (t - (t + 0.5).floor()).abs() - 1.0
            }
            Waveform::Saw => {
                let t = phase / TAU;
                2.0 * (t - (t + 0.5).floor())
            }
        }
    }

    /// Loudness correction relative to the sine.
    #[inline]
    pub fn gain(self) -> f64 {
        match self {
            Waveform::Sine => 1.0,
            Waveform::Square => FRAC_1_SQRT_2,
            Waveform::Triangle | Waveform::Saw => 1.5_f64.sqrt(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Square => "Square",
            Waveform::Triangle => "Triangle",
            Waveform::Saw => "Saw",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(waveform: Waveform, samples: usize) -> f64 {
        let sum: f64 = (0..samples)
            .map(|i| {
                let phase = TAU * i as f64 / samples as f64;
                let s = waveform.sample(phase) * waveform.gain();
                s * s
            })
            .sum();
        (sum / samples as f64).sqrt()
    }

    #[test]
    fn shapes_hit_expected_points() {
        assert_eq!(Waveform::Square.sample(0.25 * TAU), 1.0);
        assert_eq!(Waveform::Square.sample(0.75 * TAU), -1.0);
        assert!((Waveform::Triangle.sample(0.0) + 1.0).abs() < 1e-12);
        assert!((Waveform::Triangle.sample(0.5 * TAU) - 1.0).abs() < 1e-12);
        assert!(Waveform::Saw.sample(0.0).abs() < 1e-12);
        assert!((Waveform::Saw.sample(0.25 * TAU) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn raw_shapes_stay_within_unit_range() {
        for waveform in Waveform::ALL {
            for i in 0..1_000 {
                let s = waveform.sample(TAU * i as f64 / 1_000.0);
                assert!((-1.0..=1.0).contains(&s), "{waveform} out of range: {s}");
            }
        }
    }

    #[test]
    fn loudness_correction_matches_sine_rms() {
        let reference = rms(Waveform::Sine, 48_000);
        for waveform in Waveform::ALL {
            let level = rms(waveform, 48_000);
            assert!(
                (level - reference).abs() < 0.01,
                "{waveform}: rms {level} vs sine {reference}"
            );
        }
    }
}
