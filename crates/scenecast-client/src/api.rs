//! Wire types of the generation service API.

use serde::{Deserialize, Serialize};

use scenecast_protocols::{AvatarInfo, ProgressEvent, ProgressStatus, VoiceInfo};

/// `POST /api/process-video` request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmitRequest {
    pub text: String,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
}

/// `POST /api/process-video` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub job_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub estimated_time_seconds: u64,
}

/// `GET /job/{id}/progress` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct JobProgressResponse {
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub progress_percent: Option<u8>,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobProgressResponse {
    /// Normalize a poll snapshot into a progress observation.
    pub fn into_event(self) -> ProgressEvent {
        let status = ProgressStatus::parse(&self.status);
        ProgressEvent {
            job_id: Some(self.job_id),
            step: self.current_step.unwrap_or(self.status),
            status,
            message: self.error.or(self.message).unwrap_or_default(),
            percent: self.progress_percent,
        }
    }
}

/// `GET /job/{id}/result` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoResultResponse {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub srt_content: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// `POST /api/generate-script` request body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ScriptRequest {
    pub text: String,
    pub style: String,
}

/// `POST /api/generate-script` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptResponse {
    pub script: String,
    #[serde(default)]
    pub estimated_duration_seconds: Option<u64>,
}

/// `GET /api/avatars` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AvatarsResponse {
    #[serde(default)]
    pub avatars: Vec<AvatarInfo>,
}

/// `GET /api/voices` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<VoiceInfo>,
}

/// Error body the service attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
