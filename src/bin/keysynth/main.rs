//! keysynth - play the computer keyboard like a piano
//!
//! Run with: cargo run -- [--config keysynth.toml] [--sample-rate 48000]

mod app;
mod input;
mod ui;

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use keysynth::EngineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "keysynth")]
#[command(about = "Polyphonic terminal keyboard synthesizer")]
#[command(version)]
struct Args {
    /// Output sample rate in Hz (overrides the config file)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Frames per audio callback (overrides the config file)
    #[arg(long)]
    buffer_size: Option<u32>,

    /// Output channel count (overrides the config file)
    #[arg(long)]
    channels: Option<u16>,

    /// TOML file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "keysynth.log")]
    log_file: PathBuf,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = load_config(&args)?;
    tracing::info!(
        sample_rate = config.sample_rate,
        buffer_frames = config.buffer_frames,
        channels = config.channels,
        "starting keysynth"
    );

    app::run(config)
}

fn init_logging(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// File settings first, then CLI flags on top.
fn load_config(args: &Args) -> EyreResult<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
            parse_config(&text)
                .wrap_err_with(|| format!("invalid config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(buffer_size) = args.buffer_size {
        config.buffer_frames = buffer_size;
    }
    if let Some(channels) = args.channels {
        config.channels = channels;
    }

    Ok(config.sanitized())
}

fn parse_config(text: &str) -> EyreResult<EngineConfig> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keysynth::Waveform;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = parse_config(
            r#"
            sample_rate = 48000

            [envelope]
            release = 0.4

            [params]
            waveform = "saw"
            octave = -1
            "#,
        )
        .unwrap();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 2);
        assert_eq!(config.envelope.release, 0.4);
        assert_eq!(config.envelope.attack, 0.010);
        assert_eq!(config.params.waveform, Waveform::Saw);
        assert_eq!(config.params.octave, -1);
    }

    #[test]
    fn unknown_waveform_is_rejected() {
        assert!(parse_config("[params]\nwaveform = \"noise\"").is_err());
    }

    #[test]
    fn cli_flags_override_defaults_and_are_sanitized() {
        let args = Args::try_parse_from([
            "keysynth",
            "--sample-rate",
            "48000",
            "--channels",
            "0",
            "--buffer-size",
            "256",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.sample_rate, 48_000);
        assert_eq!(config.channels, 1);
        assert_eq!(config.buffer_frames, 256);
        assert_eq!(args.log_file, PathBuf::from("keysynth.log"));
    }
}
