//! Media metadata probing.
//!
//! ffmpeg run with an input and no output prints a human-readable stream
//! report to stderr and exits non-zero. The parsers here pick fields out of
//! that report with simple text heuristics. The report format is not a stable
//! interface, so every field is extracted independently and any field that
//! cannot be found stays [`UNKNOWN`].

use std::path::Path;
use tracing::{debug, warn};

use super::command::build_probe_command;
use super::traits::Transcoder;
use super::types::{MediaMetadata, UNKNOWN};

/// Source extensions treated as video containers.
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mkv", "mov"];

const AUDIO_MARKER: &str = "Audio: ";
const DURATION_MARKER: &str = "Duration: ";
const BITRATE_UNIT: &str = "kb/s";

/// Whether `path` has a video container extension (case-insensitive).
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| VIDEO_EXTENSIONS.contains(&e.as_str()))
}

/// Probes `path` with the transcoder.
///
/// Never fails: if the process cannot be started or reports nothing
/// useful, the returned metadata is simply unknown.
pub async fn probe<T: Transcoder + ?Sized>(transcoder: &T, path: &Path) -> MediaMetadata {
    let is_video = is_video_path(path);
    let args = build_probe_command(path);

    let output = match transcoder.execute(&args).await {
        Ok(output) => output,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Probe could not run transcoder");
            return MediaMetadata::unknown(is_video);
        }
    };

    // Exit status is ignored: without an output file ffmpeg always fails.
    let metadata = parse_diagnostics(&output.stderr, is_video);
    if metadata.is_unknown() {
        debug!(path = %path.display(), "Probe found no stream information");
    }
    metadata
}

/// Parses a transcoder stream report into [`MediaMetadata`].
pub fn parse_diagnostics(stderr: &str, is_video: bool) -> MediaMetadata {
    let mut metadata = MediaMetadata::unknown(is_video);

    if let Some(audio) = audio_section(stderr) {
        if let Some(label) = parse_codec_label(audio) {
            metadata.container_format = label;
        }
        if let Some(rate) = parse_sample_rate(audio) {
            metadata.sample_rate = rate;
        }
        if let Some(channels) = parse_channels(audio) {
            metadata.channels = channels;
        }
    }

    if let Some(duration) = parse_duration(stderr) {
        metadata.duration = duration;
    }

    if let Some(bitrate) = parse_bitrate(stderr) {
        metadata.bitrate = bitrate;
    }

    metadata
}

/// Text following the first "Audio: " marker, up to the end of its line.
fn audio_section(stderr: &str) -> Option<&str> {
    stderr.lines().find_map(|line| {
        line.find(AUDIO_MARKER)
            .map(|idx| &line[idx + AUDIO_MARKER.len()..])
    })
}

fn parse_codec_label(audio: &str) -> Option<String> {
    let label = audio.split(',').next()?.trim();
    non_empty(label)
}

fn parse_sample_rate(audio: &str) -> Option<String> {
    let before = &audio[..audio.find("Hz")?];
    before.split_whitespace().last().and_then(non_empty)
}

fn parse_channels(audio: &str) -> Option<String> {
    // Codec label comes first
    let parts = audio.split(',').skip(1).map(str::trim);

    for part in parts {
        if part.contains("stereo") {
            return Some("2".to_string());
        }
        if part.contains("mono") {
            return Some("1".to_string());
        }
        if part.contains("channel") {
            let first = part.split_whitespace().next()?;
            let digits: String = first.chars().take_while(|c| c.is_ascii_digit()).collect();
            return non_empty(&digits);
        }
    }

    None
}

fn parse_duration(stderr: &str) -> Option<String> {
    let start = stderr.find(DURATION_MARKER)? + DURATION_MARKER.len();
    let rest = &stderr[start..];
    let end = rest.find(&[',', '\n'][..]).unwrap_or(rest.len());
    non_empty(rest[..end].trim())
}

fn parse_bitrate(stderr: &str) -> Option<String> {
    // Whole token, so "128 kb/s" yields just the unit
    stderr
        .split_whitespace()
        .find(|t| t.contains(BITRATE_UNIT))
        .map(str::to_string)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() || s == UNKNOWN {
        None
    } else {
        Some(s.to_string())
    }
}
