//! Remote service errors: submission, polling and result fetch.

use thiserror::Error;

use super::ValidationError;

/// Submission failures. Never retried at this layer — retry is a relay
/// concern, not a submission concern.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Submission failed: {0}")]
    Network(String),

    #[error("Submission failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Submission failed: malformed response: {0}")]
    InvalidResponse(String),
}

impl SubmitError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Validation(v) => v.kind(),
            _ => "SUBMISSION_FAILED",
        }
    }
}

/// Progress poll failures.
///
/// Transient network failures during polling are swallowed by the relay loop;
/// `JobNotFound` is terminal for the job id, and `Timeout` surfaces after the
/// bounded attempt budget is spent.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Poll failed: {0}")]
    Network(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Poll failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Poll failed: malformed response: {0}")]
    InvalidResponse(String),

    #[error("Job observation timed out after {attempts} poll attempts")]
    Timeout { attempts: u32 },
}

impl ProgressError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressError::JobNotFound(_) => "JOB_NOT_FOUND",
            ProgressError::Timeout { .. } => "POLL_TIMEOUT",
            _ => "POLL_ERROR",
        }
    }
}

/// Result fetch failures.
#[derive(Debug, Error)]
pub enum ResultError {
    /// Recoverable: the job has not reached a terminal state yet. The caller
    /// decides whether to wait and retry.
    #[error("Result not ready: job is still processing")]
    NotReady,

    #[error("Result not found for job: {0}")]
    NotFound(String),

    /// The requested job id no longer matches the tracked handle (e.g. after
    /// supersession).
    #[error("Stale job id: {requested}")]
    StaleJob { requested: String },

    #[error("Result fetch failed: {0}")]
    Network(String),

    #[error("Result fetch failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Result fetch failed: malformed response: {0}")]
    InvalidResponse(String),
}

impl ResultError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResultError::NotReady => "RESULT_NOT_READY",
            ResultError::NotFound(_) => "RESULT_NOT_FOUND",
            ResultError::StaleJob { .. } => "STALE_JOB",
            _ => "RESULT_ERROR",
        }
    }

    /// Whether the caller may simply wait and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ResultError::NotReady)
    }
}
