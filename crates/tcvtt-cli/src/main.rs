//! timecodexml2webvtt - MediaInfo timecode XML to WebVTT
//!
//! Entry point: argument handling, logging and file I/O around
//! [`tcvtt_cli::convert`].

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use tcvtt_cli::cli::Cli;
use tcvtt_cli::{convert, ConvertOptions};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the WebVTT payload
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Reading {:?}", cli.input);
    let xml = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    let options = ConvertOptions {
        label_width: cli.label_width,
    };
    let vtt = convert(&xml, &options)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => {
            fs::write(path, vtt).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {:?}", path);
        }
        None => std::io::stdout()
            .lock()
            .write_all(vtt.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}
