//! UI message surface.
//!
//! Tagged request/response frames exchanged with UI clients over the
//! WebSocket surface, plus the broadcast-only frames mirrored from the bus.
//! A UI process is ephemeral — it may detach and reattach at any time and
//! must treat event delivery as at-least-once.

use serde::{Deserialize, Serialize};

use crate::bus::BusEvent;
use crate::error::ServiceError;
use crate::job::{AvatarInfo, GenerationOptions, GenerationStyle, ProgressEvent, VoiceInfo};
use crate::result::ResultRecord;
use crate::selection::SelectionRecord;

/// Persisted UI preferences slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub style: GenerationStyle,
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Request frames sent over the WebSocket surface.
///
/// UI clients issue the query and job frames; the capture side feeds
/// selection changes in through `SELECTION_CHANGED` (cache update, sent at
/// selection-change frequency) and `SELECTION_COMMITTED` (the pointer-release
/// hook that persists and broadcasts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiRequest {
    GetLastSelection,
    RequestActiveSelection,
    SelectionChanged {
        text: String,
        origin_url: String,
    },
    SelectionCommitted {
        text: String,
        origin_url: String,
    },
    GenerateVideoRequest {
        text: String,
        #[serde(default)]
        style: Option<String>,
        #[serde(default)]
        options: GenerationOptions,
    },
    PollJobProgress {
        job_id: String,
    },
    GetJobResult {
        job_id: String,
    },
    GetAvatars,
    GetVoices,
}

/// Response frames answering a [`UiRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiResponse {
    Selection {
        #[serde(skip_serializing_if = "Option::is_none")]
        selection: Option<SelectionRecord>,
    },
    JobAccepted {
        job_id: String,
        estimated_seconds: u64,
    },
    Progress {
        event: ProgressEvent,
    },
    JobResult {
        result: ResultRecord,
    },
    Avatars {
        avatars: Vec<AvatarInfo>,
    },
    Voices {
        voices: Vec<VoiceInfo>,
    },
    Ack,
    Error {
        kind: String,
        message: String,
    },
}

impl UiResponse {
    /// Build the error frame for a service failure.
    pub fn error(err: &ServiceError) -> Self {
        UiResponse::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Broadcast-only frames. No response is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiBroadcast {
    VideoProgress { event: ProgressEvent },
    SelectionUpdated { selection: SelectionRecord },
}

impl From<BusEvent> for UiBroadcast {
    fn from(event: BusEvent) -> Self {
        match event {
            BusEvent::VideoProgress(event) => UiBroadcast::VideoProgress { event },
            BusEvent::SelectionUpdated(selection) => UiBroadcast::SelectionUpdated { selection },
        }
    }
}

/// Parse a generation request's style parameter, normalizing invalid or
/// absent values to the default.
pub fn normalize_style(style: Option<&str>) -> GenerationStyle {
    GenerationStyle::parse_or_default(style)
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod tests;
