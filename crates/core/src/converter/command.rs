//! ffmpeg argument construction.
//!
//! Everything here is a pure mapping from a conversion description to an
//! argument vector (the program name is not included). Nothing touches the
//! filesystem, so every (format, preset) combination can be asserted exactly.

use std::path::Path;

use super::types::{CodecSettings, QualityPreset, TargetFormat};

/// Flag telling ffmpeg to overwrite the output without asking.
pub const OVERWRITE_FLAG: &str = "-y";

/// Audio bitrate used when the format settings leave it unset.
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";

/// Sample rate used when the format settings leave it unset.
pub const DEFAULT_SAMPLE_RATE: &str = "44100";

/// Channel count used when the format settings leave it unset.
pub const DEFAULT_CHANNELS: &str = "2";

const VIDEO_CODEC: &str = "libx264";
const VIDEO_AUDIO_CODEC: &str = "aac";

/// Builds the arguments for an information-only run.
///
/// With no output file ffmpeg prints the input's stream layout on stderr and
/// exits non-zero; the probe relies on that report alone.
pub fn build_probe_command(input_path: &Path) -> Vec<String> {
    vec!["-i".to_string(), input_path.to_string_lossy().to_string()]
}

/// Builds the arguments for converting `input_path` into `output_path`.
///
/// `quality_preset` only affects mp4 output; `None` means the default preset.
pub fn build_convert_command(
    input_path: &Path,
    target_format: TargetFormat,
    output_path: &Path,
    settings: &CodecSettings,
    quality_preset: Option<QualityPreset>,
) -> Vec<String> {
    match target_format {
        TargetFormat::Mp3 | TargetFormat::Wav => {
            build_audio_args(input_path, target_format, output_path, settings)
        }
        TargetFormat::Mp4 => {
            build_video_args(input_path, output_path, quality_preset.unwrap_or_default())
        }
    }
}

/// Builds ffmpeg arguments for audio conversion (video streams are dropped).
fn build_audio_args(
    input_path: &Path,
    target_format: TargetFormat,
    output_path: &Path,
    settings: &CodecSettings,
) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        input_path.to_string_lossy().to_string(),
        "-vn".to_string(),
        OVERWRITE_FLAG.to_string(),
    ];

    if let Some(codec) = target_format.audio_codec() {
        args.extend(["-acodec".to_string(), codec.to_string()]);
    }

    // PCM has a fixed bitrate
    if target_format == TargetFormat::Mp3 {
        args.extend([
            "-b:a".to_string(),
            setting_or(&settings.bitrate, DEFAULT_AUDIO_BITRATE),
        ]);
    }

    args.extend([
        "-ar".to_string(),
        setting_or(&settings.sample_rate, DEFAULT_SAMPLE_RATE),
        "-ac".to_string(),
        setting_or(&settings.channels, DEFAULT_CHANNELS),
    ]);

    args.push(output_path.to_string_lossy().to_string());

    args
}

/// Builds ffmpeg arguments for H.264/AAC mp4 output.
fn build_video_args(input_path: &Path, output_path: &Path, preset: QualityPreset) -> Vec<String> {
    let tuning = preset.tuning();

    let mut args = vec![
        "-i".to_string(),
        input_path.to_string_lossy().to_string(),
        OVERWRITE_FLAG.to_string(),
        "-c:v".to_string(),
        VIDEO_CODEC.to_string(),
        "-c:a".to_string(),
        VIDEO_AUDIO_CODEC.to_string(),
        "-crf".to_string(),
        tuning.crf.to_string(),
        "-preset".to_string(),
        tuning.speed.to_string(),
    ];

    if let Some(bitrate) = tuning.video_bitrate {
        args.extend(["-b:v".to_string(), bitrate.to_string()]);
    }

    args.extend(["-b:a".to_string(), tuning.audio_bitrate.to_string()]);

    // -2 keeps the width even, which libx264 requires
    if let Some(height) = tuning.max_height {
        args.extend(["-vf".to_string(), format!("scale=-2:{}", height)]);
    }

    args.push(output_path.to_string_lossy().to_string());

    args
}

fn setting_or(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}
