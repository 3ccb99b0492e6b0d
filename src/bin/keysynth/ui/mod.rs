//! TUI module for keysynth
//!
//! Reads keys, forwards them to the control surface, and draws the engine
//! state plus an oscilloscope of the output.

mod keyboard;
mod meters;
mod status;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event};
use keysynth::{ControlEvent, ControlSurface, DisplaySnapshot, EngineConfig, Flow};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use super::input::KeyTracker;

use keyboard::render_keyboard;
use meters::render_meters;
use status::render_status;
use waveform::render_waveform;

/// Samples shown in the oscilloscope
const VIS_BUFFER_SIZE: usize = 1024;

/// Input poll timeout, ~60fps redraw
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const HELP: &str =
    " [A-J] Play  [1-4] Waveform  [↑↓] Octave  [←→] Gain  [C] Chorus  [Space] All off  [Esc] Quit";

pub struct UiApp {
    control: ControlSurface,
    /// Limited mono output tapped from the render callback
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    config: EngineConfig,
    device_name: String,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control: ControlSurface,
        scope_rx: Consumer<f32>,
        config: EngineConfig,
        device_name: String,
    ) -> Self {
        Self {
            control,
            scope_rx,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            config,
            device_name,
            should_quit: false,
        }
    }

    /// Run until the user quits. `enhanced` says whether the terminal
    /// reports key releases.
    pub fn run(&mut self, terminal: &mut DefaultTerminal, enhanced: bool) -> EyreResult<()> {
        let mut keys = KeyTracker::new(self.control.keymap().clone(), enhanced);

        while !self.should_quit {
            self.poll_scope();

            let snapshot = self.control.snapshot();
            terminal.draw(|frame| self.render(frame, &snapshot))?;

            if event::poll(FRAME_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    for event in keys.on_key(key, Instant::now()) {
                        self.apply(event);
                    }
                }
            }
            for event in keys.expire(Instant::now()) {
                self.apply(event);
            }
        }

        Ok(())
    }

    fn apply(&mut self, event: ControlEvent) {
        if self.control.handle(event) == Flow::Quit {
            self.should_quit = true;
        }
    }

    /// Drain the scope ring, keeping the newest VIS_BUFFER_SIZE samples.
    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > VIS_BUFFER_SIZE {
            let excess = self.scope.len() - VIS_BUFFER_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn render(&self, frame: &mut Frame, snapshot: &DisplaySnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(5), // Keyboard
                Constraint::Length(5), // Gain and level meters
                Constraint::Min(6),    // Waveform
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        render_status(frame, chunks[0], snapshot, &self.config, &self.device_name);
        render_keyboard(frame, chunks[1], snapshot);
        render_meters(frame, chunks[2], snapshot);
        render_waveform(frame, chunks[3], &self.scope);

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
