//! Error types for backend calls.

use thiserror::Error;

/// Errors returned by an [`OrderBackend`](crate::backend::OrderBackend).
///
/// `Display` is the message shown to the user: remote errors carry the server's
/// message verbatim when it sent one.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

impl BackendError {
    /// Builds a remote error from a non-2xx response body.
    ///
    /// Uses the body's `message` (or `error`) field when it is JSON, otherwise a
    /// generic message naming the status.
    pub fn remote(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error"].iter().find_map(|key| {
                    value
                        .get(key)
                        .and_then(|m| m.as_str())
                        .filter(|m| !m.trim().is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        BackendError::Remote { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
