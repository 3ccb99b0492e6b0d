use crate::{dsp::oscillator::Waveform, synth::KeyId};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// Discrete input delivered by the window/terminal layer.
///
/// Control actions carry no payload beyond their kind; pitched keys carry the
/// identifier of the physical key.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Key { id: KeyId, action: KeyAction },
    OctaveUp,
    OctaveDown,
    GainUp,
    GainDown,
    SelectWaveform(Waveform),
    ToggleChorus,
    AllNotesOff,
    Quit,
}

impl ControlEvent {
    pub fn key_down(id: impl Into<KeyId>) -> Self {
        ControlEvent::Key {
            id: id.into(),
            action: KeyAction::Down,
        }
    }

    pub fn key_up(id: impl Into<KeyId>) -> Self {
        ControlEvent::Key {
            id: id.into(),
            action: KeyAction::Up,
        }
    }
}
