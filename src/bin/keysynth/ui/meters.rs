//! Master gain and output level gauges

use keysynth::DisplaySnapshot;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

const WARN_LEVEL: f32 = 0.7;
const CLIP_LEVEL: f32 = 0.9;

/// Green, then yellow from 0.7, red from 0.9.
fn level_color(level: f32) -> Color {
    if level >= CLIP_LEVEL {
        Color::Red
    } else if level >= WARN_LEVEL {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn gauge(label: &str, level: f64, color: Color) -> Gauge<'static> {
    let ratio = level.clamp(0.0, 1.0);
    Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio)
        .label(format!("{label} {ratio:.2}"))
}

pub fn render_meters(frame: &mut Frame, area: Rect, snapshot: &DisplaySnapshot) {
    let block = Block::default().title(" Levels ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 3])
        .split(inner);

    let meters = snapshot.meters;
    frame.render_widget(gauge("Gain", snapshot.master_gain, Color::Blue), rows[0]);
    frame.render_widget(
        gauge("RMS ", meters.rms as f64, level_color(meters.rms)),
        rows[1],
    );
    frame.render_widget(
        gauge("Peak", meters.peak as f64, level_color(meters.peak)),
        rows[2],
    );
}
