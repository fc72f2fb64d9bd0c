//! Error types for tslite-client

use thiserror::Error;

/// Classification error type
#[derive(Debug, Error)]
pub enum Error {
    /// Request rejected before reaching the network
    #[error("validation error: {0}")]
    Validation(String),

    /// An attempt exceeded its time budget
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Service answered with a non-2xx status
    #[error("service error (HTTP {status}): {detail}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Most specific message available
        detail: String,
    },

    /// 2xx response whose body could not be used
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Transport failed before any response
    #[error("network error: {0}")]
    Network(String),
}

impl Error {
    /// Whether this error came from an attempt running out of time
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Whether the service reported the endpoint as missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Service { status: 404, .. })
    }

    /// HTTP status carried by a service error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
