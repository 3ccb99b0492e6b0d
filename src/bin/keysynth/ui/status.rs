//! Status bar - waveform, octave, chorus, voice count, and device info

use keysynth::{DisplaySnapshot, EngineConfig};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DisplaySnapshot,
    config: &EngineConfig,
    device_name: &str,
) {
    let block = Block::default().title(" keysynth ").borders(Borders::ALL);

    let (chorus_label, chorus_color) = if snapshot.chorus {
        ("Chorus ON  ", Color::Green)
    } else {
        ("Chorus off  ", Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {}  ", snapshot.waveform),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Octave {:+}  ", snapshot.octave),
            Style::default().fg(Color::White),
        ),
        Span::styled(chorus_label, Style::default().fg(chorus_color)),
        Span::styled(
            format!("Voices {}  ", snapshot.voices),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "{:.1}kHz  {} frames  {}ch  {}",
                config.sample_rate as f32 / 1000.0,
                config.buffer_frames,
                config.channels,
                device_name
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
