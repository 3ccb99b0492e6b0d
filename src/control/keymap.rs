use std::collections::HashMap;

use crate::{synth::KeyId, MIN_PITCH_HZ};

/// One chromatic octave from middle C, laid out on a QWERTY home row with
/// the sharps on the row above.
const QWERTY_OCTAVE: [(char, f64); 12] = [
    ('a', 261.63),
    ('w', 277.18),
    ('s', 293.66),
    ('e', 311.13),
    ('d', 329.63),
    ('f', 349.23),
    ('t', 369.99),
    ('g', 392.00),
    ('y', 415.30),
    ('h', 440.00),
    ('u', 466.16),
    ('j', 493.88),
];

/// Maps pitched input keys to their base frequency (before octave shift).
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    pitches: HashMap<KeyId, f64>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A through J on the home row, sharps on W E T Y U. Ids are the
    /// lowercase character codes.
    pub fn qwerty() -> Self {
        let mut map = Self::new();
        for (key, hz) in QWERTY_OCTAVE {
            map.insert(KeyId::from(key), hz);
        }
        map
    }

    /// Map `id` to `base_hz`. Pitches below [`MIN_PITCH_HZ`], and non-finite
    /// ones, are raised to it.
    pub fn insert(&mut self, id: KeyId, base_hz: f64) {
        let hz = if base_hz.is_finite() {
            base_hz.max(MIN_PITCH_HZ)
        } else {
            MIN_PITCH_HZ
        };
        self.pitches.insert(id, hz);
    }

    pub fn pitch(&self, id: KeyId) -> Option<f64> {
        self.pitches.get(&id).copied()
    }

    pub fn contains(&self, id: KeyId) -> bool {
        self.pitches.contains_key(&id)
    }

    /// Every mapping, lowest pitch first.
    pub fn by_pitch(&self) -> Vec<(KeyId, f64)> {
        let mut keys: Vec<_> = self.pitches.iter().map(|(&id, &hz)| (id, hz)).collect();
        keys.sort_by(|a, b| a.1.total_cmp(&b.1));
        keys
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}
