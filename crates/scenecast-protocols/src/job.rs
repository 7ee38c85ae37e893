//! Job handles and progress events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse job lifecycle state, as persisted in the job slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Handle to the single active generation job.
///
/// Created on successful submission; its `status` is only mutated by relay
/// observations. A new submission silently supersedes the previous handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl JobHandle {
    /// Create a handle for a freshly submitted job.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Queued,
            created_at: Utc::now(),
        }
    }
}

/// Fine-grained progress state carried by broadcast events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Starting,
    Submitted,
    Queued,
    Scripting,
    Rendering,
    Processing,
    Completed,
    Error,
    Failed,
}

impl ProgressStatus {
    /// Terminal statuses end observation for a job id; nothing may be
    /// broadcast for it afterwards.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressStatus::Completed | ProgressStatus::Error | ProgressStatus::Failed
        )
    }

    /// Parse a wire status string.
    ///
    /// The generation service has grown intermediate statuses over versions
    /// (e.g. `generating_storyboard`); anything unrecognized maps to
    /// `Processing`, which is by construction non-terminal.
    pub fn parse(s: &str) -> Self {
        match s {
            "starting" => ProgressStatus::Starting,
            "submitted" => ProgressStatus::Submitted,
            "queued" => ProgressStatus::Queued,
            "scripting" => ProgressStatus::Scripting,
            "rendering" => ProgressStatus::Rendering,
            "completed" => ProgressStatus::Completed,
            "error" => ProgressStatus::Error,
            "failed" => ProgressStatus::Failed,
            _ => ProgressStatus::Processing,
        }
    }
}

impl From<ProgressStatus> for JobStatus {
    fn from(status: ProgressStatus) -> Self {
        match status {
            ProgressStatus::Starting | ProgressStatus::Submitted | ProgressStatus::Queued => {
                JobStatus::Queued
            }
            ProgressStatus::Completed => JobStatus::Completed,
            ProgressStatus::Error | ProgressStatus::Failed => JobStatus::Failed,
            _ => JobStatus::Processing,
        }
    }
}

/// Requested explanation style for the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationStyle {
    #[default]
    Simple,
    Academic,
    ChildFriendly,
    Technical,
}

impl GenerationStyle {
    /// The wire name of this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStyle::Simple => "simple",
            GenerationStyle::Academic => "academic",
            GenerationStyle::ChildFriendly => "child-friendly",
            GenerationStyle::Technical => "technical",
        }
    }

    /// Parse a style name, falling back to the default for absent or
    /// unrecognized values.
    pub fn parse_or_default(s: Option<&str>) -> Self {
        match s {
            Some("simple") => GenerationStyle::Simple,
            Some("academic") => GenerationStyle::Academic,
            Some("child-friendly") => GenerationStyle::ChildFriendly,
            Some("technical") => GenerationStyle::Technical,
            _ => GenerationStyle::default(),
        }
    }
}

/// Optional voice/avatar parameters for a generation request.
///
/// Empty strings are treated as absent so the service applies its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
}

impl GenerationOptions {
    /// Drop blank values so they serialize as absent.
    pub fn normalized(mut self) -> Self {
        if self.voice_id.as_deref().is_some_and(|v| v.trim().is_empty()) {
            self.voice_id = None;
        }
        if self.avatar_id.as_deref().is_some_and(|v| v.trim().is_empty()) {
            self.avatar_id = None;
        }
        self
    }
}

/// A presenter avatar the service can render with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarInfo {
    pub avatar_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// A narration voice the service can speak with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Acknowledgement returned from a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub job_id: String,
    pub estimated_seconds: u64,
}

/// A normalized progress observation, broadcast to UI listeners.
///
/// Transient — never persisted. Delivery is at-least-once; listeners must
/// tolerate seeing the same terminal event twice across reconnects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Absent only for the synchronous `starting` event emitted before the
    /// service has assigned a job id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub step: String,
    pub status: ProgressStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
}

impl ProgressEvent {
    /// The synchronous pre-submission event.
    pub fn starting() -> Self {
        Self {
            job_id: None,
            step: "starting".to_string(),
            status: ProgressStatus::Starting,
            message: "Starting video generation...".to_string(),
            percent: Some(0),
        }
    }

    /// The post-submission acknowledgement event.
    pub fn submitted(job_id: impl Into<String>, estimated_seconds: u64) -> Self {
        Self {
            job_id: Some(job_id.into()),
            step: "submitted".to_string(),
            status: ProgressStatus::Submitted,
            message: format!("Job submitted, estimated {estimated_seconds}s"),
            percent: Some(0),
        }
    }

    /// A locally generated failure event (e.g. observation timeout).
    pub fn local_error(job_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
            step: "error".to_string(),
            status: ProgressStatus::Error,
            message: message.into(),
            percent: None,
        }
    }

    /// Whether this event ends observation for its job id.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
