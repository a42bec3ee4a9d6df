//! Writer error types.

use std::path::PathBuf;
use thiserror::Error;

/// File creation or write failure while replacing a config file.
///
/// The on-disk content may be left incomplete when this is returned; the
/// write is not atomic. Callers that need atomicity wrap the writer with
/// write-to-temp-then-rename.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create `{0}`")]
    Create(PathBuf, #[source] std::io::Error),

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] std::io::Error),
}
