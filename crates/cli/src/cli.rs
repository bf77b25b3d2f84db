use clap::Parser;
use std::path::PathBuf;

use mediabatch_core::{QualityPreset, TargetFormat};

#[derive(Debug, Parser)]
#[command(name = "mediabatch")]
#[command(author, version, about = "Batch-convert audio and video files with ffmpeg")]
pub struct Cli {
    /// Path to config file (created with defaults if missing)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: mp3, wav or mp4 (default: from config)
    #[arg(short, long)]
    pub format: Option<TargetFormat>,

    /// Quality preset for mp4 output
    #[arg(short, long, value_parser = parse_preset)]
    pub quality: Option<QualityPreset>,

    /// Write to <name>_converted.<ext> even if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Path to the ffmpeg executable (overrides config)
    #[arg(long)]
    pub ffmpeg: Option<PathBuf>,

    /// Maximum number of files to process (overrides config)
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Print the result as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// Files to convert
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

fn parse_preset(s: &str) -> Result<QualityPreset, String> {
    QualityPreset::ALL
        .into_iter()
        .find(|p| p.as_str() == s)
        .ok_or_else(|| {
            let names: Vec<&str> = QualityPreset::ALL.iter().map(|p| p.as_str()).collect();
            format!("unknown preset '{}', expected one of: {}", s, names.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "mediabatch",
            "--format",
            "mp4",
            "--quality",
            "high_compression",
            "--overwrite",
            "--max-files",
            "5",
            "a.mkv",
            "b.mov",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(TargetFormat::Mp4));
        assert_eq!(cli.quality, Some(QualityPreset::HighCompression));
        assert!(cli.overwrite);
        assert_eq!(cli.max_files, Some(5));
        assert_eq!(cli.files, vec![PathBuf::from("a.mkv"), PathBuf::from("b.mov")]);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mediabatch", "song.flac"]).unwrap();
        assert_eq!(cli.format, None);
        assert_eq!(cli.quality, None);
        assert!(!cli.overwrite);
        assert!(!cli.json);
    }

    #[test]
    fn test_requires_files() {
        assert!(Cli::try_parse_from(["mediabatch"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_values() {
        assert!(Cli::try_parse_from(["mediabatch", "-f", "flac", "a.mp3"]).is_err());
        assert!(Cli::try_parse_from(["mediabatch", "-q", "extreme", "a.mp3"]).is_err());
    }
}
