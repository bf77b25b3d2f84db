//! Error types for the batch module.

use thiserror::Error;

use crate::converter::ConverterError;

/// Errors that stop a batch before any file is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The transcoder failed its pre-flight check.
    #[error("transcoder setup failed: {0}")]
    Setup(#[from] ConverterError),

    /// The worker task panicked or was cancelled.
    #[error("batch worker failed: {0}")]
    Worker(String),
}
