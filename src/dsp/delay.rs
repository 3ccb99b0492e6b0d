/// Fixed-length circular sample buffer.
///
/// The write cursor is owned by the caller so several lines can share one
/// cursor and advance in lockstep. The buffer is allocated once in `new` and
/// never resized, which keeps reads and writes allocation-free.
pub struct DelayLine {
    buffer: Vec<f64>,
}

impl DelayLine {
    /// A line holding `len` samples (at least 2, so interpolation always has
    /// two distinct taps).
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(2)],
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn write(&mut self, cursor: usize, sample: f64) {
        let len = self.buffer.len();
        self.buffer[cursor % len] = sample;
    }

    /// Read `delay_samples` behind `cursor`, linearly interpolating between
    /// the two nearest integer taps.
    ///
    /// Delays are clamped to `[0, len - 1]`; a delay of 0 returns the sample
    /// most recently written at `cursor`.
    #[inline]
    pub fn read_interpolated(&self, cursor: usize, delay_samples: f64) -> f64 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(0.0, (len - 1) as f64);

        let mut read_pos = (cursor % len) as f64 - delay;
        if read_pos < 0.0 {
            read_pos += len as f64;
        }

        let i0 = (read_pos.floor() as usize) % len;
        let i1 = (i0 + 1) % len;
        let frac = read_pos - read_pos.floor();

        let a = self.buffer[i0];
        let b = self.buffer[i1];
        a + (b - a) * frac
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
    }
}
