//! Terminal keys to control events.
//!
//! With keyboard enhancement the terminal reports real press and release
//! events. Without it there are no releases at all, only the initial press and
//! autorepeat, so a held note is assumed released once its key has been quiet
//! for [`HOLD_TIMEOUT`].

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keysynth::{ControlEvent, KeyId, KeyMap, Waveform};

pub const HOLD_TIMEOUT: Duration = Duration::from_millis(300);

/// What a key means before press/release tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Note(KeyId),
    Control(ControlEvent),
}

/// Gain and octave steps keep stepping while their key is held; everything
/// else fires once per physical press.
fn repeats(event: ControlEvent) -> bool {
    matches!(
        event,
        ControlEvent::GainUp
            | ControlEvent::GainDown
            | ControlEvent::OctaveUp
            | ControlEvent::OctaveDown
    )
}

fn bind(code: KeyCode, modifiers: KeyModifiers, keymap: &KeyMap) -> Option<Binding> {
    let event = match code {
        KeyCode::Esc => ControlEvent::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => ControlEvent::Quit,
        KeyCode::Char(c) if keymap.contains(KeyId::from(c)) => {
            return Some(Binding::Note(KeyId::from(c)))
        }
        KeyCode::Up => ControlEvent::OctaveUp,
        KeyCode::Down => ControlEvent::OctaveDown,
        KeyCode::Right => ControlEvent::GainUp,
        KeyCode::Left => ControlEvent::GainDown,
        KeyCode::Char('1') => ControlEvent::SelectWaveform(Waveform::Sine),
        KeyCode::Char('2') => ControlEvent::SelectWaveform(Waveform::Square),
        KeyCode::Char('3') => ControlEvent::SelectWaveform(Waveform::Triangle),
        KeyCode::Char('4') => ControlEvent::SelectWaveform(Waveform::Saw),
        KeyCode::Char('c' | 'C') => ControlEvent::ToggleChorus,
        KeyCode::Char(' ') => ControlEvent::AllNotesOff,
        _ => return None,
    };
    Some(Binding::Control(event))
}

/// Tracks which note keys are down and turns raw key events into
/// [`ControlEvent`]s.
pub struct KeyTracker {
    keymap: KeyMap,
    enhanced: bool,
    /// Held note keys and when each was last seen pressed or repeating
    held: HashMap<KeyId, Instant>,
    /// Last one-shot control and when its key was last seen. Plain terminals
    /// report autorepeat as fresh presses, so this stands in for the release.
    latched: Option<(ControlEvent, Instant)>,
}

impl KeyTracker {
    pub fn new(keymap: KeyMap, enhanced: bool) -> Self {
        Self {
            keymap,
            enhanced,
            held: HashMap::new(),
            latched: None,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Vec<ControlEvent> {
        let Some(binding) = bind(key.code, key.modifiers, &self.keymap) else {
            return vec![];
        };

        match (binding, key.kind) {
            (Binding::Note(id), KeyEventKind::Press | KeyEventKind::Repeat) => {
                match self.held.insert(id, now) {
                    Some(_) => vec![], // autorepeat of a sounding note
                    None => vec![ControlEvent::key_down(id)],
                }
            }
            (Binding::Note(id), KeyEventKind::Release) => match self.held.remove(&id) {
                Some(_) => vec![ControlEvent::key_up(id)],
                None => vec![],
            },
            (Binding::Control(event), _) if repeats(event) => match key.kind {
                KeyEventKind::Release => vec![],
                _ => vec![event],
            },
            (Binding::Control(event), KeyEventKind::Press) => {
                if !self.enhanced && self.is_latched(event, now) {
                    self.latched = Some((event, now));
                    return vec![];
                }
                self.latched = Some((event, now));
                if event == ControlEvent::AllNotesOff {
                    self.held.clear();
                }
                vec![event]
            }
            (Binding::Control(_), KeyEventKind::Repeat) => vec![],
            (Binding::Control(event), KeyEventKind::Release) => {
                if matches!(self.latched, Some((latched, _)) if latched == event) {
                    self.latched = None;
                }
                vec![]
            }
        }
    }

    fn is_latched(&self, event: ControlEvent, now: Instant) -> bool {
        matches!(
            self.latched,
            Some((latched, last)) if latched == event
                && now.saturating_duration_since(last) < HOLD_TIMEOUT
        )
    }

    /// Key-ups for notes whose keys went quiet. Does nothing when the terminal
    /// reports releases.
    pub fn expire(&mut self, now: Instant) -> Vec<ControlEvent> {
        if self.enhanced {
            return vec![];
        }
        let mut released = Vec::new();
        self.held.retain(|&id, &mut last| {
            let quiet = now.saturating_duration_since(last) >= HOLD_TIMEOUT;
            if quiet {
                released.push(ControlEvent::key_up(id));
            }
            !quiet
        });
        released
    }
}
