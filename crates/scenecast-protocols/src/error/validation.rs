//! Input validation errors.

use thiserror::Error;

/// Rejected input. Never retried; surfaced to the caller immediately, before
/// any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Selected text is empty")]
    EmptyText,

    #[error("Selected text is too long: {len} characters (max {max})")]
    TextTooLong { len: usize, max: usize },
}

impl ValidationError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::EmptyText => "EMPTY_TEXT",
            ValidationError::TextTooLong { .. } => "TEXT_TOO_LONG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_kind() {
        assert_eq!(ValidationError::EmptyText.kind(), "EMPTY_TEXT");
    }

    #[test]
    fn test_too_long_display() {
        let err = ValidationError::TextTooLong { len: 5000, max: 3000 };
        assert!(err.to_string().contains("5000"));
        assert!(err.to_string().contains("3000"));
        assert_eq!(err.kind(), "TEXT_TOO_LONG");
    }
}
