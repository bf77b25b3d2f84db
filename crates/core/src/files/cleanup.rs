//! Removal of leftover output files.

use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

/// Result of a [`remove_files`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// Files that were removed.
    pub files_removed: usize,
    /// Any errors that occurred.
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Whether every existing file was removed.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Best-effort removal of `paths`. Paths that do not exist are skipped.
pub async fn remove_files(paths: &[PathBuf]) -> CleanupResult {
    let mut result = CleanupResult::default();

    for path in paths {
        if !path.exists() {
            continue;
        }
        match fs::remove_file(path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed file");
                result.files_removed += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove file");
                result
                    .errors
                    .push(format!("Failed to remove {}: {}", path.display(), e));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remove_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a_converted.mp3");
        let b = dir.path().join("b_converted.mp3");
        std::fs::write(&a, b"partial").unwrap();

        let result = remove_files(&[a.clone(), b]).await;
        assert_eq!(result.files_removed, 1);
        assert!(result.success());
        assert!(!a.exists());
    }

    #[tokio::test]
    async fn test_remove_directory_reports_error() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("out.wav");
        std::fs::create_dir(&sub).unwrap();

        let result = remove_files(&[sub.clone()]).await;
        assert_eq!(result.files_removed, 0);
        assert!(!result.success());
        assert!(sub.exists());
    }
}
