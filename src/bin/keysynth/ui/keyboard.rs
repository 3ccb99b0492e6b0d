//! On-screen keyboard
//!
//! One cell per mapped key, lowest pitch on the left. Held keys light green,
//! releasing keys yellow; sharps sit on a darker background.

use keysynth::{DisplaySnapshot, KeyId, KeyState};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Nearest equal-tempered note name for `hz`, e.g. `A4` for 440.
fn note_name(hz: f64) -> String {
    let midi = (69.0 + 12.0 * (hz / 440.0).log2()).round() as i32;
    let name = NOTE_NAMES[midi.rem_euclid(12) as usize];
    format!("{name}{}", midi.div_euclid(12) - 1)
}

fn key_label(id: KeyId) -> String {
    char::from_u32(id.0)
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| "?".into())
}

fn key_style(state: KeyState, sharp: bool) -> Style {
    match state {
        KeyState::Held => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        KeyState::Releasing => Style::default().fg(Color::Black).bg(Color::Yellow),
        KeyState::Off if sharp => Style::default().fg(Color::White).bg(Color::DarkGray),
        KeyState::Off => Style::default().fg(Color::Black).bg(Color::Gray),
    }
}

pub fn render_keyboard(frame: &mut Frame, area: Rect, snapshot: &DisplaySnapshot) {
    let block = Block::default().title(" Keyboard ").borders(Borders::ALL);

    let transpose = 2.0_f64.powi(snapshot.octave);
    let mut labels = Vec::with_capacity(snapshot.keys.len() * 2);
    let mut notes = Vec::with_capacity(snapshot.keys.len() * 2);
    for key in &snapshot.keys {
        let name = note_name(key.pitch_hz * transpose);
        let style = key_style(key.state, name.contains('#'));
        labels.push(Span::styled(format!(" {:^4}", key_label(key.id)), style));
        notes.push(Span::styled(format!(" {name:^4}"), style));
        labels.push(Span::raw(" "));
        notes.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(vec![Line::from(labels), Line::from(notes)])
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
