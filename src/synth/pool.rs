use std::collections::HashMap;

use crate::{
    dsp::{envelope::EnvelopeSettings, oscillator::Waveform},
    synth::{voice::Voice, KeyId},
};

/// Slots reserved up front so steady-state playing never rehashes.
const INITIAL_CAPACITY: usize = 64;

/// What a key is doing right now, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// Not in the pool, or finished sounding
    Off,
    /// Key is down
    Held,
    /// Key is up, release tail still sounding
    Releasing,
}

/// Identifier-keyed collection of every voice that is held or decaying.
///
/// Insertion (which may allocate) only happens from [`VoicePool::note_on`],
/// which runs on the control side. The render side only mixes and reclaims,
/// neither of which allocates.
pub struct VoicePool {
    voices: HashMap<KeyId, Voice>,
    envelope: EnvelopeSettings,
    amplitude: f64,
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new(EnvelopeSettings::default(), crate::synth::voice::DEFAULT_AMPLITUDE)
    }
}

impl VoicePool {
    pub fn new(envelope: EnvelopeSettings, amplitude: f64) -> Self {
        Self {
            voices: HashMap::with_capacity(INITIAL_CAPACITY),
            envelope: envelope.sanitized(),
            amplitude,
        }
    }

    /// Start the voice for `id`, transposed by `octave` octaves.
    ///
    /// Creates the voice on first use; an existing voice (held or decaying)
    /// is retriggered in place, so there is never more than one voice per key.
    pub fn note_on(
        &mut self,
        id: KeyId,
        base_pitch_hz: f64,
        octave: i32,
        waveform: Waveform,
        sample_rate: f64,
    ) {
        let pitch_hz = base_pitch_hz * 2.0_f64.powi(octave);
        let (envelope, amplitude) = (self.envelope, self.amplitude);
        self.voices
            .entry(id)
            .or_insert_with(|| Voice::new(envelope, amplitude))
            .trigger(pitch_hz, sample_rate, waveform);
    }

    /// Release the voice for `id`. Unknown ids are ignored: the voice may
    /// already have finished and been reclaimed.
    pub fn note_off(&mut self, id: KeyId) {
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.release();
        }
    }

    /// Release every voice (all-notes-off).
    pub fn release_all(&mut self) {
        for voice in self.voices.values_mut() {
            voice.release();
        }
    }

    /// Sum one sample from every voice.
    #[inline]
    pub fn mix_sample(&mut self, sample_rate: f64) -> f64 {
        self.voices
            .values_mut()
            .map(|voice| voice.next_sample(sample_rate))
            .sum()
    }

    /// Drop every voice that has finished and is no longer held.
    pub fn reclaim(&mut self) {
        self.voices.retain(|_, voice| !voice.is_reclaimable());
    }

    pub fn key_state(&self, id: KeyId) -> KeyState {
        match self.voices.get(&id) {
            Some(voice) if voice.is_held() => KeyState::Held,
            Some(voice) if voice.is_alive() => KeyState::Releasing,
            _ => KeyState::Off,
        }
    }

    pub fn get(&self, id: KeyId) -> Option<&Voice> {
        self.voices.get(&id)
    }

    /// Voices currently producing sound.
    pub fn sounding(&self) -> usize {
        self.voices.values().filter(|v| v.is_alive()).count()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}
