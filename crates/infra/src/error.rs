use std::path::PathBuf;

use thiserror::Error;

use reviewdesk_core::DomainError;

use crate::config::ConfigError;

/// Log read/write error.
///
/// These are **infrastructure errors** as opposed to domain rejections.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A log file could not be opened, written, flushed or read.
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log line could not be decoded.
    #[error("malformed record at {stream}:{line}: {reason}")]
    Malformed {
        stream: String,
        line: u64,
        reason: String,
    },
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Error returned by [`crate::ReviewStore`] operations.
///
/// A `Domain` error means nothing changed. A `Persistence` error from a mutating
/// call means the mutation **was applied in memory** but may be missing from
/// disk, so it will not survive a restart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type StoreResult<T> = Result<T, StoreError>;
