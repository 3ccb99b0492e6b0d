//! Lock-free level metering.
//!
//! The audio thread publishes RMS and peak once per buffer; the display reads
//! them whenever it likes. Each level is an independent `AtomicU32` holding
//! `f32::to_bits`, so neither side ever waits on the other or on the voice
//! lock. The two values are not published as a pair: a reader may see the RMS
//! of one buffer with the peak of the next, which is harmless for a meter.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeterReading {
    pub rms: f32,
    pub peak: f32,
}

#[derive(Debug, Default)]
pub struct Meters {
    rms: AtomicU32,
    peak: AtomicU32,
}

impl Meters {
    /// Store a reading, clamping both levels into `[0, 1]`.
    pub fn publish(&self, reading: MeterReading) {
        self.rms
            .store(clamp_unit(reading.rms).to_bits(), Ordering::Relaxed);
        self.peak
            .store(clamp_unit(reading.peak).to_bits(), Ordering::Relaxed);
    }

    pub fn rms(&self) -> f32 {
        f32::from_bits(self.rms.load(Ordering::Relaxed))
    }

    pub fn peak(&self) -> f32 {
        f32::from_bits(self.peak.load(Ordering::Relaxed))
    }

    pub fn reading(&self) -> MeterReading {
        MeterReading {
            rms: self.rms(),
            peak: self.peak(),
        }
    }
}

fn clamp_unit(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

/// Running sum-of-squares and peak over one buffer. Owned by the renderer.
#[derive(Debug, Default)]
pub struct LevelAccumulator {
    sum_squares: f64,
    peak: f64,
    frames: usize,
}

impl LevelAccumulator {
    #[inline]
    pub fn add(&mut self, sample: f64) {
        self.sum_squares += sample * sample;
        self.peak = self.peak.max(sample.abs());
        self.frames += 1;
    }

    /// RMS and peak of everything added. An empty buffer reads as silence.
    pub fn finish(&self) -> MeterReading {
        if self.frames == 0 {
            return MeterReading::default();
        }
        MeterReading {
            rms: (self.sum_squares / self.frames as f64).sqrt() as f32,
            peak: self.peak as f32,
        }
    }
}
