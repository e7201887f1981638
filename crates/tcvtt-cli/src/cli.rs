use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "timecodexml2webvtt")]
#[command(author, version, about = "Convert MediaInfo timecode XML into a WebVTT timecode track")]
pub struct Cli {
    /// Timecode XML file from MediaInfo
    #[arg(required = true)]
    pub input: PathBuf,

    /// Write the WebVTT file here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Width stream labels are right-aligned to
    #[arg(long, default_value_t = 40)]
    pub label_width: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
