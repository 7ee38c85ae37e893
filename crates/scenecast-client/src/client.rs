//! Generation service client.

use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use scenecast_protocols::{
    AvatarInfo, GenerationOptions, GenerationStyle, JobSubmission, ProgressError, RelayError,
    ResultError, ResultRecord, SubmitError, ValidationError, VoiceInfo, MAX_TEXT_LEN,
};

use crate::api::{
    ApiErrorBody, AvatarsResponse, JobProgressResponse, ScriptRequest, ScriptResponse,
    SubmitRequest, SubmitResponse, VideoResultResponse, VoicesResponse,
};

/// Client for the remote video-generation service.
///
/// One instance per service origin; cheap to clone. Every method performs at
/// most one HTTP round trip.
#[derive(Debug, Clone)]
pub struct VideoClient {
    base_url: Url,
    http: reqwest::Client,
}

impl VideoClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// The service origin this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Check submission text against the service's input limits.
    pub fn validate(text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        let len = text.chars().count();
        if len > MAX_TEXT_LEN {
            return Err(ValidationError::TextTooLong { len, max: MAX_TEXT_LEN });
        }
        Ok(())
    }

    /// Submit text for video generation.
    ///
    /// Validation happens before any network activity; invalid text never
    /// produces an HTTP request.
    pub async fn submit(
        &self,
        text: &str,
        style: GenerationStyle,
        options: GenerationOptions,
    ) -> Result<JobSubmission, SubmitError> {
        Self::validate(text)?;
        let options = options.normalized();

        let body = SubmitRequest {
            text: text.to_string(),
            style: style.as_str().to_string(),
            avatar_id: options.avatar_id,
            voice_id: options.voice_id,
        };
        let response = self
            .http
            .post(self.endpoint("api/process-video"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response).await;
            return Err(SubmitError::Api { status: status.as_u16(), message });
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;
        info!(
            "submitted job {} (estimated {}s)",
            parsed.job_id, parsed.estimated_time_seconds
        );
        Ok(JobSubmission {
            job_id: parsed.job_id,
            estimated_seconds: parsed.estimated_time_seconds,
        })
    }

    /// Fetch the current progress snapshot for a job.
    pub async fn poll_progress(&self, job_id: &str) -> Result<JobProgressResponse, ProgressError> {
        let response = self
            .http
            .get(self.endpoint(&format!("job/{job_id}/progress")))
            .send()
            .await
            .map_err(|e| ProgressError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProgressError::JobNotFound(job_id.to_string()));
        }
        if !status.is_success() {
            let message = error_detail(response).await;
            return Err(ProgressError::Api { status: status.as_u16(), message });
        }

        let parsed: JobProgressResponse = response
            .json()
            .await
            .map_err(|e| ProgressError::InvalidResponse(e.to_string()))?;
        debug!(
            "job {} progress: {} ({:?}%)",
            parsed.job_id, parsed.status, parsed.progress_percent
        );
        Ok(parsed)
    }

    /// Fetch the final result of a completed job.
    ///
    /// Relative artifact locations are normalized against the service origin,
    /// so the returned record only carries absolute URLs.
    pub async fn fetch_result(&self, job_id: &str) -> Result<ResultRecord, ResultError> {
        let response = self
            .http
            .get(self.endpoint(&format!("job/{job_id}/result")))
            .send()
            .await
            .map_err(|e| ResultError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Err(ResultError::NotReady);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ResultError::NotFound(job_id.to_string()));
        }
        if !status.is_success() {
            let message = error_detail(response).await;
            return Err(ResultError::Api { status: status.as_u16(), message });
        }

        let parsed: VideoResultResponse = response
            .json()
            .await
            .map_err(|e| ResultError::InvalidResponse(e.to_string()))?;
        let video_url = parsed
            .video_url
            .ok_or_else(|| ResultError::InvalidResponse("missing video_url".to_string()))?;

        Ok(ResultRecord {
            video_url: self.absolutize(&video_url)?,
            subtitle_payload: parsed.srt_content,
            thumbnail_url: match parsed.thumbnail_url {
                Some(u) => Some(self.absolutize(&u)?),
                None => None,
            },
            duration: parsed.duration,
        })
    }

    /// Generate a narration script preview without starting a video job.
    pub async fn generate_script(
        &self,
        text: &str,
        style: GenerationStyle,
    ) -> Result<ScriptResponse, SubmitError> {
        Self::validate(text)?;

        let body = ScriptRequest {
            text: text.to_string(),
            style: style.as_str().to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("api/generate-script"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response).await;
            return Err(SubmitError::Api { status: status.as_u16(), message });
        }
        response
            .json()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))
    }

    /// List the presenter avatars the service offers.
    pub async fn list_avatars(&self) -> Result<Vec<AvatarInfo>, SubmitError> {
        let response = self
            .http
            .get(self.endpoint("api/avatars"))
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response).await;
            return Err(SubmitError::Api { status: status.as_u16(), message });
        }
        let parsed: AvatarsResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;
        Ok(parsed.avatars)
    }

    /// List the narration voices the service offers.
    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SubmitError> {
        let response = self
            .http
            .get(self.endpoint("api/voices"))
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response).await;
            return Err(SubmitError::Api { status: status.as_u16(), message });
        }
        let parsed: VoicesResponse = response
            .json()
            .await
            .map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;
        Ok(parsed.voices)
    }

    /// The WebSocket channel address for a job's progress stream.
    pub fn ws_url(&self, job_id: &str) -> Result<Url, RelayError> {
        let mut url = self.base_url.clone();
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(RelayError::Connect(format!(
                    "unsupported service scheme: {other}"
                )))
            }
        };
        url.set_scheme(scheme)
            .map_err(|()| RelayError::Connect("failed to derive ws scheme".to_string()))?;
        url.set_path(&format!("/ws/job/{job_id}"));
        Ok(url)
    }

    fn absolutize(&self, location: &str) -> Result<String, ResultError> {
        if Url::parse(location).is_ok() {
            return Ok(location.to_string());
        }
        self.base_url
            .join(location)
            .map(|u| u.to_string())
            .map_err(|e| ResultError::InvalidResponse(format!("bad artifact url {location}: {e}")))
    }
}

async fn error_detail(response: reqwest::Response) -> String {
    match response.json::<ApiErrorBody>().await {
        Ok(body) => body.detail.unwrap_or_else(|| "unknown error".to_string()),
        Err(_) => "unknown error".to_string(),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
