//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::ConverterError;

/// Placeholder for any metadata field the transcoder did not report.
pub const UNKNOWN: &str = "unknown";

/// Output format of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// WAVE (uncompressed PCM)
    Wav,
    /// MPEG-4 Part 14 video container
    Mp4,
}

impl TargetFormat {
    /// Every supported output format, in display order.
    pub const ALL: [TargetFormat; 3] = [Self::Mp3, Self::Wav, Self::Mp4];

    /// Returns the file extension (and format identifier) for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Mp4 => "mp4",
        }
    }

    /// Whether the output carries a video stream.
    pub fn is_video(&self) -> bool {
        matches!(self, Self::Mp4)
    }

    /// Returns the ffmpeg audio encoder used for audio-only targets.
    pub fn audio_codec(&self) -> Option<&'static str> {
        match self {
            Self::Mp3 => Some("libmp3lame"),
            Self::Wav => Some("pcm_s16le"),
            Self::Mp4 => None,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            "mp4" => Ok(Self::Mp4),
            other => Err(ConverterError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Encoder tuning applied to mp4 conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    /// High quality, no caps.
    #[default]
    Default,
    /// Balanced size and quality.
    MediumCompression,
    /// Small files, downscaled to 720p.
    HighCompression,
    /// Very small files, downscaled to 480p.
    UltraCompression,
    /// Smallest possible files, downscaled to 360p.
    HellCompression,
}

/// Fixed encoder parameters for one [`QualityPreset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetTuning {
    /// Constant rate factor passed to x264 (lower = better).
    pub crf: u8,
    /// x264 speed/efficiency preset.
    pub speed: &'static str,
    /// Video bitrate cap.
    pub video_bitrate: Option<&'static str>,
    /// Audio bitrate cap.
    pub audio_bitrate: &'static str,
    /// Output height; width follows the aspect ratio.
    pub max_height: Option<u32>,
}

/// Indexed by `QualityPreset as usize`.
const PRESET_TABLE: [PresetTuning; 5] = [
    PresetTuning {
        crf: 20,
        speed: "medium",
        video_bitrate: None,
        audio_bitrate: "192k",
        max_height: None,
    },
    PresetTuning {
        crf: 23,
        speed: "medium",
        video_bitrate: Some("1500k"),
        audio_bitrate: "128k",
        max_height: None,
    },
    PresetTuning {
        crf: 28,
        speed: "slow",
        video_bitrate: Some("500k"),
        audio_bitrate: "64k",
        max_height: Some(720),
    },
    PresetTuning {
        crf: 32,
        speed: "slower",
        video_bitrate: Some("300k"),
        audio_bitrate: "48k",
        max_height: Some(480),
    },
    PresetTuning {
        crf: 36,
        speed: "veryslow",
        video_bitrate: Some("150k"),
        audio_bitrate: "32k",
        max_height: Some(360),
    },
];

impl QualityPreset {
    /// Every preset, mildest first.
    pub const ALL: [QualityPreset; 5] = [
        Self::Default,
        Self::MediumCompression,
        Self::HighCompression,
        Self::UltraCompression,
        Self::HellCompression,
    ];

    /// Returns the encoder parameters for this preset.
    pub fn tuning(self) -> &'static PresetTuning {
        &PRESET_TABLE[self as usize]
    }

    /// Returns the configuration name of this preset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::MediumCompression => "medium_compression",
            Self::HighCompression => "high_compression",
            Self::UltraCompression => "ultra_compression",
            Self::HellCompression => "hell_compression",
        }
    }

    /// Parses a preset name, falling back to [`QualityPreset::Default`] for
    /// anything unrecognised.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name.trim())
            .unwrap_or_default()
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codec parameters for one output format.
///
/// Values stay strings because they are handed to ffmpeg verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSettings {
    /// Audio bitrate (e.g. "192k").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    /// Sample rate in Hz (e.g. "44100").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<String>,
    /// Channel count (e.g. "2").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,
}

/// Per-format codec settings keyed by format identifier ("mp3", "wav", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatSettings(BTreeMap<String, CodecSettings>);

impl Default for FormatSettings {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            "mp3".to_string(),
            CodecSettings {
                bitrate: Some("192k".to_string()),
                sample_rate: Some("44100".to_string()),
                channels: Some("2".to_string()),
            },
        );
        map.insert(
            "wav".to_string(),
            CodecSettings {
                bitrate: None,
                sample_rate: Some("44100".to_string()),
                channels: Some("2".to_string()),
            },
        );
        Self(map)
    }
}

impl FormatSettings {
    /// Settings with no entries; every builder default applies.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets the codec settings for a format.
    pub fn with(mut self, format: TargetFormat, settings: CodecSettings) -> Self {
        self.0.insert(format.extension().to_string(), settings);
        self
    }

    /// Returns the settings for `format`, or empty settings if none are configured.
    pub fn get(&self, format: TargetFormat) -> CodecSettings {
        self.0.get(format.extension()).cloned().unwrap_or_default()
    }

    /// Iterates over the configured format identifiers.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Media characteristics parsed from the transcoder's diagnostic output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Codec/format label of the first audio stream (e.g. "mp3").
    pub container_format: String,
    /// Duration as reported (e.g. "00:03:25.04").
    pub duration: String,
    /// Overall bitrate as reported (e.g. "128 kb/s").
    pub bitrate: String,
    /// Audio channel count.
    pub channels: String,
    /// Audio sample rate in Hz.
    pub sample_rate: String,
    /// Whether the source file is a video container.
    pub is_video: bool,
}

impl MediaMetadata {
    /// Metadata with every field unknown.
    pub fn unknown(is_video: bool) -> Self {
        Self {
            container_format: UNKNOWN.to_string(),
            duration: UNKNOWN.to_string(),
            bitrate: UNKNOWN.to_string(),
            channels: UNKNOWN.to_string(),
            sample_rate: UNKNOWN.to_string(),
            is_video,
        }
    }

    /// Whether no field could be parsed.
    pub fn is_unknown(&self) -> bool {
        [
            &self.container_format,
            &self.duration,
            &self.bitrate,
            &self.channels,
            &self.sample_rate,
        ]
        .iter()
        .all(|f| f.as_str() == UNKNOWN)
    }
}
