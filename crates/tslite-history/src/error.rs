//! Error types for tslite-history
//!
//! Neither error type escapes the store's public operations: storage failures
//! are logged and recovered, clipboard failures become a [`crate::CopyOutcome`].

use thiserror::Error;

/// Persistence error
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem error
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend cannot be used right now
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Clipboard write error
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// No clipboard tool could be started
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard tool refused or failed
    #[error("clipboard write failed: {0}")]
    WriteFailed(String),
}
