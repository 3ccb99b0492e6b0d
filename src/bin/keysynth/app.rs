//! Audio device setup and the terminal session around it.

use std::io::stdout;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, BuildStreamError, Device, OutputCallbackInfo, SampleRate, Stream, StreamConfig};
use crossterm::event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags};
use rtrb::{Consumer, RingBuffer};

use keysynth::{EngineConfig, KeyMap, SynthEngine};

use super::ui::UiApp;

/// Scope ring capacity. A few UI frames of audio at any supported rate.
const SCOPE_CAPACITY: usize = 8_192;

/// Open the default output device, play until the user quits, then tear down
/// in order: audio stream (and with it the renderer) first, engine last.
pub fn run(config: EngineConfig) -> EyreResult<()> {
    let engine = SynthEngine::new(config);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let device_name = device.name().unwrap_or_else(|_| "unknown device".into());
    tracing::info!(device = %device_name, "using output device");

    let (stream, scope_rx) = start_stream(&device, &engine)?;
    stream.play().wrap_err("failed to start audio stream")?;

    let mut ui = UiApp::new(
        engine.control(KeyMap::qwerty()),
        scope_rx,
        engine.config().clone(),
        device_name,
    );
    let result = run_terminal(&mut ui);

    drop(stream);
    drop(ui);
    drop(engine);
    tracing::info!("audio stopped");

    result
}

/// Try the configured buffer size first; some backends only take their own.
fn start_stream(device: &Device, engine: &SynthEngine) -> EyreResult<(Stream, Consumer<f32>)> {
    let config = engine.config();
    let fixed = StreamConfig {
        channels: config.channels,
        sample_rate: SampleRate(config.sample_rate),
        buffer_size: BufferSize::Fixed(config.buffer_frames),
    };

    match build_stream(device, engine, &fixed) {
        Ok(started) => Ok(started),
        Err(err) => {
            tracing::warn!(
                %err,
                buffer_frames = config.buffer_frames,
                "fixed buffer size rejected, falling back to device default"
            );
            let fallback = StreamConfig {
                buffer_size: BufferSize::Default,
                ..fixed
            };
            build_stream(device, engine, &fallback).wrap_err("failed to build output stream")
        }
    }
}

fn build_stream(
    device: &Device,
    engine: &SynthEngine,
    stream_config: &StreamConfig,
) -> Result<(Stream, Consumer<f32>), BuildStreamError> {
    let (scope_tx, scope_rx) = RingBuffer::new(SCOPE_CAPACITY);
    let mut renderer = engine.renderer().with_scope(scope_tx);

    let stream = device.build_output_stream(
        stream_config,
        move |data: &mut [f32], _: &OutputCallbackInfo| renderer.render(data),
        // Underruns and device hiccups are not fatal; note them and carry on.
        |err| tracing::warn!(%err, "audio stream error"),
        None,
    )?;

    tracing::info!(
        sample_rate = stream_config.sample_rate.0,
        channels = stream_config.channels,
        buffer_size = ?stream_config.buffer_size,
        "audio stream built"
    );
    Ok((stream, scope_rx))
}

/// Raw mode and alternate screen around the UI loop, restored on every exit path.
fn run_terminal(ui: &mut UiApp) -> EyreResult<()> {
    let mut terminal = ratatui::init();

    let enhanced = matches!(crossterm::terminal::supports_keyboard_enhancement(), Ok(true));
    if enhanced {
        let _ = crossterm::execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );
    }
    tracing::info!(enhanced, "keyboard release reporting");

    let result = ui.run(&mut terminal, enhanced);

    if enhanced {
        let _ = crossterm::execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    ratatui::restore();

    result.wrap_err("terminal UI failed")
}
