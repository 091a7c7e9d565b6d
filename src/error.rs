//! Error types for snapshot sources.

use thiserror::Error;

/// Errors that can occur when fetching a snapshot.
///
/// Only [`SourceError::AuthFailed`] is fatal; the others skip the cycle and
/// leave the last good frame on screen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Network, DNS, timeout, or the API answered with a non-success status.
    #[error("Management API unreachable: {0}")]
    Unreachable(String),

    /// The credentials were rejected.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Whether retrying with the same configuration is pointless.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::AuthFailed(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else if err.is_timeout() {
            SourceError::Unreachable("request timed out".to_string())
        } else {
            SourceError::Unreachable(err.to_string())
        }
    }
}
