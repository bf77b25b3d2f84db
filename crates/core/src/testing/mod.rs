//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`Transcoder`](crate::converter::Transcoder)
//! and a recording progress sink, allowing whole batches to be exercised
//! without ffmpeg installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediabatch_core::testing::{fixtures, MockTranscoder, RecordingProgressSink};
//!
//! let transcoder = MockTranscoder::new();
//! transcoder.set_probe_report(fixtures::SAMPLE_MP3_REPORT).await;
//!
//! let sink = RecordingProgressSink::new();
//! orchestrator.run(&requests, Some(&sink)).await?;
//! assert_eq!(sink.events().len(), requests.len() * 2);
//! ```

mod mock_transcoder;

pub use mock_transcoder::MockTranscoder;

use std::sync::Mutex;

use crate::batch::{ProgressEvent, ProgressSink};

/// Progress sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Just the percentages, in order.
    pub fn percents(&self) -> Vec<f32> {
        self.events().into_iter().map(|e| e.percent).collect()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn on_progress(&self, message: &str, percent: f32) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(ProgressEvent {
                message: message.to_string(),
                percent,
            });
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// ffmpeg stream report for a stereo mp3.
    pub const SAMPLE_MP3_REPORT: &str = "\
Input #0, mp3, from 'song.mp3':
  Metadata:
    title           : Example Song
    artist          : Example Artist
  Duration: 00:03:25.04, start: 0.025057, bitrate: 128 kb/s
  Stream #0:0: Audio: mp3, 44100 Hz, stereo, fltp, 128 kb/s
";

    /// ffmpeg stream report for a matroska file with a 6-channel audio track.
    pub const SAMPLE_MKV_REPORT: &str = "\
Input #0, matroska,webm, from 'film.mkv':
  Metadata:
    ENCODER         : Lavf58.76.100
  Duration: 01:32:10.50, start: 0.000000, bitrate: 4521 kb/s
  Stream #0:0: Video: h264 (High), yuv420p(progressive), 1920x1080, 23.98 fps, 23.98 tbr, 1k tbn (default)
  Stream #0:1(eng): Audio: aac (LC), 48000 Hz, 6 channels, fltp (default)
";

    /// Diagnostic ffmpeg prints for a file it cannot read.
    pub const INVALID_DATA_DIAGNOSTIC: &str =
        "bad.mp3: Invalid data found when processing input\n";

    /// Create a small file named `name` in `dir`.
    pub fn touch(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, format!("source {}", name))?;
        Ok(path)
    }
}
