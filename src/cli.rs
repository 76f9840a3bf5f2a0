//! Command line and environment configuration

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal music player with cover art and tap/hold controls")]
pub struct Cli {
    /// Directory containing the audio files to play
    #[arg(short, long, env = "DASHTUNE_MUSIC_DIR", default_value = "assets/music")]
    pub music_dir: PathBuf,

    /// Initial volume between 0.0 and 1.0
    #[arg(short, long, env = "DASHTUNE_VOLUME", default_value_t = 1.0, value_parser = parse_volume)]
    pub volume: f64,

    /// Directory for log files
    #[arg(long, env = "DASHTUNE_LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,

    /// Show the total duration instead of the remaining time
    #[arg(long)]
    pub show_total: bool,
}

fn parse_volume(value: &str) -> Result<f64, String> {
    let volume: f64 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if volume.is_nan() {
        return Err("volume must be a number".to_string());
    }
    Ok(volume.clamp(0.0, 1.0))
}
