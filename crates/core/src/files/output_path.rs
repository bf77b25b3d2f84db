//! Destination path derivation.

use std::path::{Path, PathBuf};

use crate::converter::TargetFormat;

/// Suffix appended to the input stem.
pub const CONVERTED_SUFFIX: &str = "_converted";

/// Builds `<dir>/<stem>_converted[_<index>].<ext>` without touching the
/// filesystem.
pub fn candidate_path(input_path: &Path, format: TargetFormat, index: Option<u32>) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    let name = match index {
        Some(n) => format!(
            "{}{}_{}.{}",
            stem,
            CONVERTED_SUFFIX,
            n,
            format.extension()
        ),
        None => format!("{}{}.{}", stem, CONVERTED_SUFFIX, format.extension()),
    };

    match input_path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Returns the first candidate path that does not exist yet.
///
/// The name is not reserved: two calls without writing in between return the
/// same path.
pub fn resolve_output_path(input_path: &Path, format: TargetFormat) -> PathBuf {
    let base = candidate_path(input_path, format, None);
    if !base.exists() {
        return base;
    }

    (1..=u32::MAX)
        .map(|n| candidate_path(input_path, format, Some(n)))
        .find(|p| !p.exists())
        .unwrap_or(base)
}

/// Temporary sibling of `output` that a replacement is encoded into before
/// being renamed over it.
///
/// Hidden, keeps the extension so ffmpeg still picks the right muxer, and
/// never names an existing file.
pub fn staging_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let ext = output
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or_default();
    let dir = output.parent().unwrap_or_else(|| Path::new(""));

    let base = dir.join(format!(".{}.partial.{}", stem, ext));
    if !base.exists() {
        return base;
    }

    (1..=u32::MAX)
        .map(|n| dir.join(format!(".{}.partial_{}.{}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(base)
}
