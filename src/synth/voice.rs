use std::f64::consts::TAU;

use crate::dsp::envelope::{Envelope, EnvelopeSettings, EnvelopeStage};
use crate::dsp::oscillator::Waveform;
use crate::HEADROOM;

/// Static per-voice gain. Structurally per voice so velocity could scale it.
pub const DEFAULT_AMPLITUDE: f64 = 0.5;

/// One sounding note: a phase-accumulator oscillator shaped by an envelope.
#[derive(Debug, Clone)]
pub struct Voice {
    pitch_hz: f64,
    phase: f64,
    phase_increment: f64,
    waveform: Waveform,
    envelope: Envelope,
    held: bool,
    alive: bool,
    amplitude: f64,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new(EnvelopeSettings::default(), DEFAULT_AMPLITUDE)
    }
}

impl Voice {
    /// An idle, silent voice. Call [`Voice::trigger`] to start it.
    pub fn new(envelope: EnvelopeSettings, amplitude: f64) -> Self {
        Self {
            pitch_hz: 0.0,
            phase: 0.0,
            phase_increment: 0.0,
            waveform: Waveform::Sine,
            envelope: Envelope::new(envelope),
            held: false,
            alive: false,
            amplitude,
        }
    }

    /// Start (or restart) the note from silence.
    ///
    /// Resets phase and envelope, so a retriggered voice begins a fresh
    /// attack rather than stacking on top of the old one.
    pub fn trigger(&mut self, pitch_hz: f64, sample_rate: f64, waveform: Waveform) {
        self.pitch_hz = pitch_hz;
        self.waveform = waveform;
        self.phase_increment = TAU * pitch_hz / sample_rate;
        self.phase = 0.0;
        self.envelope.note_on();
        self.held = true;
        self.alive = true;
    }

    /// Key up: begin the release. A voice that already finished stays idle.
    pub fn release(&mut self) {
        self.held = false;
        self.envelope.note_off();
    }

    /// Advance one sample and return the shaped output.
    ///
    /// Dead voices return 0.0 without touching any state.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f64) -> f64 {
        if !self.alive {
            return 0.0;
        }

        let level = self.envelope.next_sample(sample_rate);
        if !self.envelope.is_active() {
            self.alive = false;
        }

        let osc = self.waveform.sample(self.phase);

        self.phase += self.phase_increment;
        if self.phase >= TAU {
            self.phase = self.phase.rem_euclid(TAU);
        }

        self.amplitude * level * HEADROOM * self.waveform.gain() * osc
    }

    /// Largest magnitude this voice can ever emit.
    pub fn peak_bound(&self) -> f64 {
        self.amplitude * HEADROOM * self.waveform.gain()
    }

    pub fn pitch_hz(&self) -> f64 {
        self.pitch_hz
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.envelope.stage()
    }

    pub fn level(&self) -> f64 {
        self.envelope.level()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Finished and no longer held: safe to remove from the pool.
    pub fn is_reclaimable(&self) -> bool {
        !self.alive && !self.held
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44_100.0;

    fn triggered(waveform: Waveform) -> Voice {
        let mut voice = Voice::default();
        voice.trigger(440.0, SAMPLE_RATE, waveform);
        voice
    }

    fn render_until(voice: &mut Voice, stage: EnvelopeStage) {
        for _ in 0..SAMPLE_RATE as usize {
            if voice.stage() == stage {
                return;
            }
            voice.next_sample(SAMPLE_RATE);
        }
        panic!("voice never reached {stage:?}");
    }

    #[test]
    fn trigger_starts_attack_from_silence() {
        let voice = triggered(Waveform::Saw);
        assert_eq!(voice.stage(), EnvelopeStage::Attack);
        assert_eq!(voice.level(), 0.0);
        assert_eq!(voice.phase(), 0.0);
        assert!(voice.is_held() && voice.is_alive());
        assert!((voice.pitch_hz() - 440.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sustain_output_is_bounded_for_every_waveform() {
        for waveform in Waveform::ALL {
            let mut voice = triggered(waveform);
            render_until(&mut voice, EnvelopeStage::Sustain);
            let bound = voice.peak_bound();
            for _ in 0..4_410 {
                let s = voice.next_sample(SAMPLE_RATE);
                assert!(s.abs() <= bound + 1e-12, "{waveform}: {s} > {bound}");
            }
        }
    }

    #[test]
    fn envelope_is_monotonic_per_stage() {
        let mut voice = triggered(Waveform::Sine);
        let mut prev = voice.level();
        while voice.stage() == EnvelopeStage::Attack {
            voice.next_sample(SAMPLE_RATE);
            assert!(voice.level() >= prev);
            prev = voice.level();
        }
        while voice.stage() == EnvelopeStage::Decay {
            voice.next_sample(SAMPLE_RATE);
            assert!(voice.level() <= prev);
            prev = voice.level();
        }
        voice.release();
        while voice.stage() == EnvelopeStage::Release {
            voice.next_sample(SAMPLE_RATE);
            assert!(voice.level() <= prev);
            prev = voice.level();
        }
    }

    #[test]
    fn alive_flips_exactly_when_release_reaches_zero() {
        let mut voice = triggered(Waveform::Square);
        render_until(&mut voice, EnvelopeStage::Sustain);
        voice.release();
        assert!(!voice.is_held());
        assert!(voice.is_alive());

        while voice.stage() == EnvelopeStage::Release {
            assert!(voice.is_alive());
            voice.next_sample(SAMPLE_RATE);
        }
        assert!(!voice.is_alive());
        assert_eq!(voice.level(), 0.0);
        assert_eq!(voice.stage(), EnvelopeStage::Idle);
        assert!(voice.is_reclaimable());
    }

    #[test]
    fn dead_voice_is_idempotent() {
        let mut voice = triggered(Waveform::Triangle);
        voice.release();
        render_until(&mut voice, EnvelopeStage::Idle);

        let phase = voice.phase();
        for _ in 0..100 {
            assert_eq!(voice.next_sample(SAMPLE_RATE), 0.0);
        }
        assert_eq!(voice.phase(), phase);
        assert_eq!(voice.stage(), EnvelopeStage::Idle);
    }

    #[test]
    fn held_voice_never_releases() {
        let mut voice = triggered(Waveform::Sine);
        for _ in 0..44_100 {
            voice.next_sample(SAMPLE_RATE);
            assert_ne!(voice.stage(), EnvelopeStage::Release);
        }
        assert!(voice.is_alive());
    }

    #[test]
    fn release_of_untriggered_voice_stays_idle() {
        let mut voice = Voice::default();
        voice.release();
        assert_eq!(voice.stage(), EnvelopeStage::Idle);
        assert!(voice.is_reclaimable());
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut voice = Voice::default();
        voice.trigger(15_000.0, SAMPLE_RATE, Waveform::Saw);
        for _ in 0..10_000 {
            voice.next_sample(SAMPLE_RATE);
            assert!((0.0..TAU).contains(&voice.phase()));
        }
    }
}
