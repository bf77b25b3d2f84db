//! Filesystem helpers around a batch.
//!
//! - [`FileValidator`] filters candidate inputs down to existing files with a
//!   whitelisted extension, capped at a maximum batch size.
//! - [`resolve_output_path`] derives a destination next to the input that does
//!   not collide with an existing file.
//! - [`staging_path`] names the temporary sibling a replacement is written to.
//! - [`remove_files`] deletes outputs left behind by failed conversions.

mod cleanup;
mod output_path;
mod validator;

pub use cleanup::{remove_files, CleanupResult};
pub use output_path::{candidate_path, resolve_output_path, staging_path, CONVERTED_SUFFIX};
pub use validator::{FileValidator, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_FILES};
