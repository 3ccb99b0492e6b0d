//! Cubic soft-knee limiter.

/*
Soft-Knee Limiting
==================

Summing several voices can exceed full scale. A hard clip at ±1.0 flattens
the waveform abruptly and the corner is audible as a harsh edge. Instead, the
signal above a threshold is bent smoothly towards a ceiling.

Vocabulary
----------

  threshold   Below this magnitude the limiter does nothing (identity).

  knee        The width of the region above the threshold over which the
              curve bends. Inputs beyond threshold + knee all land on the
              ceiling.

  ceiling     thr + knee·(1 - 1/3) = thr + ⅔·knee. With thr = 0.90 and
              knee = 0.10 the ceiling is 0.9667.


The Curve
---------

For a = |x| above the threshold:

    t = min(1, (a - thr) / knee)
    y = thr + knee · (t - t³/3)

  out
  0.967 ┤                 ┌────────────
        │            ╭────╯
  0.90  ┤       ╭────╯
        │     ╱
        │   ╱
        │ ╱
    0.0 └─────────┬────────┬────────── in
                 0.9      1.0

The curve is continuous in value at both ends of the knee and has unit slope
entering it, so quiet material passes untouched while peaks are rounded off.
The sign of the input is preserved. It costs one branch and a handful of
multiplies per sample.
*/

pub const THRESHOLD: f64 = 0.90;
pub const KNEE: f64 = 0.10;

#[derive(Debug, Clone, Copy)]
pub struct SoftKneeLimiter {
    threshold: f64,
    knee: f64,
}

impl Default for SoftKneeLimiter {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD,
            knee: KNEE,
        }
    }
}

impl SoftKneeLimiter {
    /// Highest magnitude the limiter can emit.
    pub fn ceiling(&self) -> f64 {
        self.threshold + self.knee * (2.0 / 3.0)
    }

    #[inline]
    pub fn process(&self, x: f64) -> f64 {
        let a = x.abs();
        if a <= self.threshold {
            return x;
        }
        let t = ((a - self.threshold) / self.knee).min(1.0);
        let compressed = self.threshold + self.knee * (t - t * t * t / 3.0);
        compressed.copysign(x)
    }
}
