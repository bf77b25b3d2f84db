//! Input file validation.

use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::converter::ConverterError;

/// Input extensions accepted when none are configured.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 10] = [
    "mp3", "wav", "aac", "m4a", "wma", "ogg", "flac", "mkv", "mp4", "mov",
];

/// Batch size limit when none is configured.
pub const DEFAULT_MAX_FILES: usize = 20;

/// Filters user-supplied paths down to files a batch can process.
///
/// Only reads filesystem metadata; nothing is opened or modified.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_files: usize,
    allowed_extensions: Vec<String>,
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FILES,
            DEFAULT_ALLOWED_EXTENSIONS.iter().copied(),
        )
    }
}

impl FileValidator {
    /// Creates a validator. Extensions are matched without the dot,
    /// case-insensitively.
    pub fn new<I, S>(max_files: usize, allowed_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            max_files,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Creates a validator from the `[app]` configuration section.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.max_files, &config.allowed_extensions)
    }

    /// Maximum number of paths considered per batch.
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Whether `ext` (without dot) is whitelisted.
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.allowed_extensions.iter().any(|a| *a == ext)
    }

    /// Checks a single path, returning its normalized form if acceptable.
    pub fn check(&self, path: &Path) -> Result<PathBuf, ConverterError> {
        let normalized = normalize(path);

        if !normalized.is_file() {
            return Err(ConverterError::InputNotFound { path: normalized });
        }

        let ext = normalized
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !self.is_allowed_extension(ext) {
            return Err(ConverterError::UnsupportedFormat {
                format: if ext.is_empty() {
                    normalized.display().to_string()
                } else {
                    ext.to_string()
                },
            });
        }

        Ok(normalized)
    }

    /// Returns the acceptable subset of `paths`, in input order.
    ///
    /// Paths beyond `max_files` are dropped with a warning before any checks
    /// run. Rejected paths are logged and skipped.
    pub fn validate<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<PathBuf> {
        let considered = if paths.len() > self.max_files {
            warn!(
                given = paths.len(),
                max_files = self.max_files,
                "Too many files selected, only the first {} will be processed",
                self.max_files
            );
            &paths[..self.max_files]
        } else {
            paths
        };

        let mut accepted = Vec::with_capacity(considered.len());
        for path in considered {
            match self.check(path.as_ref()) {
                Ok(normalized) => {
                    debug!(path = %normalized.display(), "Accepted input");
                    accepted.push(normalized);
                }
                Err(e) => warn!(path = %path.as_ref().display(), error = %e, "Skipping input"),
            }
        }

        accepted
    }
}

/// Lexical normalization: drops redundant separators and `.` components and
/// folds `name/..` pairs. Symlinks are not resolved.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // Nothing above the root
                Some(Component::RootDir) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn test_filters_missing_and_unsupported() {
        let dir = TempDir::new().unwrap();
        let song = touch(dir.path(), "song.mp3");
        let notes = touch(dir.path(), "notes.txt");
        let missing = dir.path().join("gone.wav");
        let clip = touch(dir.path(), "clip.MKV");

        let validator = FileValidator::default();
        let accepted = validator.validate(&[song.clone(), notes, missing, clip.clone()]);
        assert_eq!(accepted, vec![song, clip]);
    }

    #[test]
    fn test_truncates_to_max_files_in_order() {
        let dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..25)
            .map(|i| touch(dir.path(), &format!("track{:02}.flac", i)))
            .collect();

        let validator = FileValidator::default();
        let accepted = validator.validate(&paths);
        assert_eq!(accepted.len(), 20);
        assert_eq!(accepted, paths[..20].to_vec());
    }

    #[test]
    fn test_truncation_happens_before_filtering() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("missing.mp3");
        let good = touch(dir.path(), "ok.mp3");

        let validator = FileValidator::new(1, ["mp3"]);
        assert!(validator.validate(&[bad, good]).is_empty());
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("album.flac");
        std::fs::create_dir(&sub).unwrap();

        let err = FileValidator::default().check(&sub).unwrap_err();
        assert!(matches!(err, ConverterError::InputNotFound { .. }));
    }

    #[test]
    fn test_no_extension_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "README");

        let err = FileValidator::default().check(&file).unwrap_err();
        assert!(matches!(err, ConverterError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_normalizes_path() {
        let dir = TempDir::new().unwrap();
        let song = touch(dir.path(), "song.ogg");
        let messy = PathBuf::from(format!("{}//./song.ogg", dir.path().display()));

        let accepted = FileValidator::default().validate(&[messy]);
        assert_eq!(accepted, vec![song]);
    }

    #[test]
    fn test_normalizes_parent_components() {
        let dir = TempDir::new().unwrap();
        let song = touch(dir.path(), "song.ogg");
        std::fs::create_dir(dir.path().join("album")).unwrap();
        let messy = dir.path().join("album").join("..").join("song.ogg");

        let accepted = FileValidator::default().validate(&[messy]);
        assert_eq!(accepted, vec![song]);
    }

    #[test]
    fn test_normalize_lexical_rules() {
        assert_eq!(normalize(Path::new("a/b/../c.mp3")), PathBuf::from("a/c.mp3"));
        assert_eq!(normalize(Path::new("../x/./y.wav")), PathBuf::from("../x/y.wav"));
        assert_eq!(normalize(Path::new("a/../../y.wav")), PathBuf::from("../y.wav"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_stops_at_root() {
        assert_eq!(normalize(Path::new("/../a.mp3")), PathBuf::from("/a.mp3"));
    }

    #[test]
    fn test_custom_extensions() {
        let validator = FileValidator::new(5, [".FLAC", "opus"]);
        assert!(validator.is_allowed_extension("flac"));
        assert!(validator.is_allowed_extension("OPUS"));
        assert!(!validator.is_allowed_extension("mp3"));
        assert_eq!(validator.max_files(), 5);
    }

    #[test]
    fn test_from_config() {
        let validator = FileValidator::from_config(&AppConfig::default());
        assert_eq!(validator.max_files(), DEFAULT_MAX_FILES);
        assert!(validator.is_allowed_extension("mov"));
    }
}
