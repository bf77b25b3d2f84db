//! Converter module for driving the external transcoder.
//!
//! This module provides the `Transcoder` trait, the ffmpeg implementation,
//! pure argument construction for probe and convert runs, and parsing of
//! ffmpeg's stream report into [`MediaMetadata`].
//!
//! # Features
//!
//! - Audio extraction/transcoding to MP3 and WAV
//! - Video transcoding to H.264/AAC MP4 with quality presets
//! - Best-effort metadata probing from ffmpeg's stderr
//!
//! # Example
//!
//! ```ignore
//! use mediabatch_core::converter::{
//!     build_convert_command, probe, FfmpegTranscoder, FormatSettings, TargetFormat, Transcoder,
//! };
//!
//! let ffmpeg = FfmpegTranscoder::new("/usr/bin/ffmpeg");
//! ffmpeg.validate().await?;
//!
//! let meta = probe(&ffmpeg, Path::new("/music/song.flac")).await;
//! println!("Duration: {}", meta.duration);
//!
//! let settings = FormatSettings::default();
//! let args = build_convert_command(
//!     Path::new("/music/song.flac"),
//!     TargetFormat::Mp3,
//!     Path::new("/music/song_converted.mp3"),
//!     &settings.get(TargetFormat::Mp3),
//!     None,
//! );
//! let output = ffmpeg.execute(&args).await?;
//! assert!(output.success);
//! ```

mod command;
mod error;
mod ffmpeg;
mod probe;
mod traits;
mod types;

pub use command::{
    build_convert_command, build_probe_command, DEFAULT_AUDIO_BITRATE, DEFAULT_CHANNELS,
    DEFAULT_SAMPLE_RATE, OVERWRITE_FLAG,
};
pub use error::ConverterError;
pub use ffmpeg::{FfmpegTranscoder, DEFAULT_FFMPEG_PATH};
pub use probe::{is_video_path, parse_diagnostics, probe, VIDEO_EXTENSIONS};
pub use traits::{Transcoder, TranscoderOutput};
pub use types::{
    CodecSettings, FormatSettings, MediaMetadata, PresetTuning, QualityPreset, TargetFormat,
    UNKNOWN,
};
