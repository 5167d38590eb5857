//! Error types for task store operations.

use thiserror::Error;

/// Coarse classification of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed row does not exist (or is not visible to the caller).
    NotFound,
    /// The store refused the payload.
    ValidationRejected,
    /// Network or service failure.
    ServiceUnavailable,
    /// Credentials were missing or rejected.
    Unauthorized,
}

/// Errors that can occur during task store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Row not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Payload rejected by the store.
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// Credentials rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Store responded with a server-side failure.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// HTTP transport or decoding failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl StoreError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Rejected(_) => ErrorKind::ValidationRejected,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Unavailable(_) | Self::Http(_) => ErrorKind::ServiceUnavailable,
        }
    }

    /// Map an HTTP status code returned while addressing `subject`.
    #[must_use]
    pub fn from_status(status: u16, subject: impl Into<String>, body: &str) -> Self {
        let subject = subject.into();
        let detail = if body.trim().is_empty() {
            format!("{subject} (HTTP {status})")
        } else {
            format!("{subject} (HTTP {status}): {}", body.trim())
        };
        match status {
            404 | 406 => Self::NotFound(subject),
            400 | 409 | 422 => Self::Rejected(detail),
            401 | 403 => Self::Unauthorized(detail),
            _ => Self::Unavailable(detail),
        }
    }
}
