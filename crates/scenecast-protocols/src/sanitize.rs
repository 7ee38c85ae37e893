//! Selection text sanitization.
//!
//! Selections arrive from arbitrary documents and may carry markup fragments
//! and ragged whitespace. Sanitization strips `<...>` tag sequences, collapses
//! whitespace runs to single spaces and trims the ends. The result of
//! sanitizing twice equals sanitizing once.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of text accepted for submission, in characters.
///
/// Matches the generation service's own request validator.
pub const MAX_TEXT_LEN: usize = 3000;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sanitize selection text for storage or transmission.
pub fn sanitize_text(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    let collapsed = WS_RE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
