//! Relay channel errors.

use thiserror::Error;

/// Failures on the streaming progress channel. None of these abort
/// observation — they signal the relay to fall back to polling.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Stream connect failed: {0}")]
    Connect(String),

    #[error("Stream error: {0}")]
    WebSocket(String),
}

impl RelayError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        "RELAY_ERROR"
    }
}
