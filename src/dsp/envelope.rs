#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
ADSR Envelope Implementation
============================

A linear ADSR envelope generator that shapes the amplitude of every voice.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the oscillator output to control its amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The key down/up signal. Key down triggers Attack from zero.
              Key up triggers Release from wherever we are.

  step        How much `level` changes per sample. Calculated from the stage's
              span, its duration, and the sample rate.


The Shape: Linear Ramps, Flat Sustain
-------------------------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Sustain is a plateau: the level holds at S for as long as the key is down.
Textbook ADSR designs sometimes let sustain drift downward; this one does not.


The Math: Span to Step
----------------------

Each stage moves the level across a fixed span at a fixed slope:

    attack_step  = 1.0             / (attack_seconds  * sample_rate)
    decay_step   = (1.0 - sustain) / (decay_seconds   * sample_rate)
    release_step = sustain         / (release_seconds * sample_rate)

Release uses the same slope no matter where it starts. A key released during
the attack or decay (level above S) takes proportionally longer than
`release_seconds` to fall silent.

A non-positive duration, or a span of zero, yields a step of 1.0: the stage
completes on the very next sample. Without the zero-span guard a patch with
S = 0 would never finish its release and the voice would never be reclaimed.

The step is recomputed on every sample from the caller-supplied rate, so the
envelope carries no cached state that depends on the sample rate.


The State Machine
-----------------

    ┌──────┐  note_on   ┌────────┐  level=1   ┌───────┐  level=S  ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ─────────→ │ Decay │ ────────→ │ Sustain │
    └──────┘            └────────┘            └───────┘           └─────────┘
        ↑                    │ note_off           │ note_off           │ note_off
        │   level=0     ┌─────────┐ ←─────────────┴────────────────────┘
        └────────────── │ Release │ ←──┘
                        └─────────┘
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,    // Gate low, envelope inactive, level = 0
    Attack,  // Gate just went high, ramping up to 1.0
    Decay,   // Reached peak, ramping down to sustain level
    Sustain, // Holding at sustain level while gate is high
    Release, // Gate went low, ramping down to 0
}

/// Stage durations and sustain level shared by every voice in a pool.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSettings {
    /// Seconds to ramp 0 → 1
    pub attack: f64,
    /// Seconds to ramp 1 → sustain
    pub decay: f64,
    /// Plateau level while the key is held (0.0 - 1.0)
    pub sustain: f64,
    /// Seconds to ramp sustain → 0
    pub release: f64,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            attack: 0.010,
            decay: 0.060,
            sustain: 0.70,
            release: 0.150,
        }
    }
}

impl EnvelopeSettings {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
        .sanitized()
    }

    /// Clamp negative or non-finite times to zero and sustain into `[0, 1]`.
    pub fn sanitized(self) -> Self {
        let time = |t: f64| if t.is_finite() { t.max(0.0) } else { 0.0 };
        let sustain = if self.sustain.is_finite() {
            self.sustain.clamp(0.0, 1.0)
        } else {
            Self::default().sustain
        };
        Self {
            attack: time(self.attack),
            decay: time(self.decay),
            sustain,
            release: time(self.release),
        }
    }
}

/// Per-sample change needed to cross `span` in `seconds`.
#[inline]
fn stage_step(span: f64, seconds: f64, sample_rate: f64) -> f64 {
    let samples = seconds * sample_rate;
    if samples <= 0.0 || span <= 0.0 {
        1.0
    } else {
        span / samples
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    settings: EnvelopeSettings,
    stage: EnvelopeStage,
    level: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(EnvelopeSettings::default())
    }
}

impl Envelope {
    pub fn new(settings: EnvelopeSettings) -> Self {
        Self {
            settings: settings.sanitized(),
            stage: EnvelopeStage::Idle,
            level: 0.0,
        }
    }

    /// Gate high: restart the attack from zero.
    ///
    /// Always resets the level, so a retriggered key starts a fresh attack
    /// instead of continuing from wherever the previous note was.
    pub fn note_on(&mut self) {
        self.level = 0.0;
        self.stage = EnvelopeStage::Attack;
    }

    /// Gate low: ramp to zero from the current level. Idle stays idle.
    pub fn note_off(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self, sample_rate: f64) -> f64 {
        let s = &self.settings;
        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += stage_step(1.0, s.attack, sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= stage_step(1.0 - s.sustain, s.decay, sample_rate);
                if self.level <= s.sustain {
                    self.level = s.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = s.sustain;
            }

            EnvelopeStage::Release => {
                self.level -= stage_step(s.sustain, s.release, sample_rate);
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn settings(&self) -> &EnvelopeSettings {
        &self.settings
    }
}
