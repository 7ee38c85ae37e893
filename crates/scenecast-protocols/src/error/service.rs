//! Top-level service error.

use thiserror::Error;

use super::{
    CaptureError, ProgressError, ResultError, StoreError, SubmitError, ValidationError,
};

/// Aggregate error surfaced over the UI message surface.
///
/// `Unexpected` is the catch-all: logged with context at the site where it is
/// produced, surfaced generically to avoid leaking internals.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    Result(#[from] ResultError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unexpected error")]
    Unexpected,
}

impl ServiceError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(e) => e.kind(),
            ServiceError::Capture(e) => e.kind(),
            ServiceError::Submit(e) => e.kind(),
            ServiceError::Progress(e) => e.kind(),
            ServiceError::Result(e) => e.kind(),
            ServiceError::Store(e) => e.kind(),
            ServiceError::Unexpected => "UNEXPECTED_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_delegation() {
        let err = ServiceError::from(ValidationError::EmptyText);
        assert_eq!(err.kind(), "EMPTY_TEXT");
        let err = ServiceError::from(ResultError::NotReady);
        assert_eq!(err.kind(), "RESULT_NOT_READY");
        assert_eq!(ServiceError::Unexpected.kind(), "UNEXPECTED_ERROR");
    }

    #[test]
    fn test_transparent_display() {
        let err = ServiceError::from(CaptureError::NoActiveTarget);
        assert_eq!(err.to_string(), "No active capture target");
    }
}
