//! Selection capture errors.

use thiserror::Error;

/// Failures while querying the capture context.
///
/// `Communication` is retryable exactly once (re-inject and retry); the other
/// variants fail fast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("No active capture target")]
    NoActiveTarget,

    #[error("Page does not allow script injection: {0}")]
    RestrictedPage(String),

    #[error("Capture context unreachable: {0}")]
    Communication(String),
}

impl CaptureError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CaptureError::NoActiveTarget => "NO_ACTIVE_TARGET",
            CaptureError::RestrictedPage(_) => "RESTRICTED_PAGE",
            CaptureError::Communication(_) => "COMMUNICATION_ERROR",
        }
    }

    /// Whether one re-injection attempt is worth making before surfacing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CaptureError::Communication(_))
    }
}
