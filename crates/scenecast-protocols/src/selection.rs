//! Selection records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sanitize::sanitize_text;

/// Where a selection capture originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionSource {
    /// Captured via the context-menu entry.
    ContextMenu,
    /// Captured by the in-page content script.
    ContentScript,
}

/// A captured text selection.
///
/// The single persisted selection slot holds the most recent record; each new
/// capture overwrites the previous one. `text` is always sanitized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub text: String,
    pub source: SelectionSource,
    pub origin_url: String,
    pub captured_at: DateTime<Utc>,
}

impl SelectionRecord {
    /// Build a record from raw selection text, sanitizing it.
    ///
    /// Returns `None` when nothing survives sanitization — empty selections
    /// are never recorded.
    pub fn capture(
        raw_text: &str,
        source: SelectionSource,
        origin_url: impl Into<String>,
    ) -> Option<Self> {
        let text = sanitize_text(raw_text);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text,
            source,
            origin_url: origin_url.into(),
            captured_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
