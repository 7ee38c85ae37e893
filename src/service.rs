//! Core service facade.

use std::sync::Arc;

use tracing::{info, warn};

use scenecast_capture::{CaptureAgent, SelectionTracker};
use scenecast_client::VideoClient;
use scenecast_protocols::{
    sanitize_text, AvatarInfo, BusEvent, EventBus, GenerationOptions, GenerationStyle, JobHandle,
    JobSubmission, ProgressEvent, ResultError, ResultRecord, SelectionRecord, SelectionSource,
    ServiceError, UiPreferences, UiRequest, UiResponse, VoiceInfo,
};
use scenecast_relay::ProgressRelay;
use scenecast_store::StateStore;

/// Ties the store, client, relay and capture layers together behind the
/// operations the UI surface exposes.
#[derive(Clone)]
pub struct CoreService {
    bus: EventBus,
    store: StateStore,
    client: VideoClient,
    relay: Arc<ProgressRelay>,
    tracker: SelectionTracker,
    agent: Option<Arc<CaptureAgent>>,
}

impl CoreService {
    pub fn new(
        bus: EventBus,
        store: StateStore,
        client: VideoClient,
        relay: Arc<ProgressRelay>,
        tracker: SelectionTracker,
        agent: Option<Arc<CaptureAgent>>,
    ) -> Self {
        Self { bus, store, client, relay, tracker, agent }
    }

    /// Submit text for generation and start observing the job.
    ///
    /// A `starting` event goes out after validation but before the network
    /// call, so listeners see feedback immediately and rejected input never
    /// produces a progress event; the submission itself supersedes whatever
    /// job was tracked before.
    pub async fn generate_video(
        &self,
        text: &str,
        style: Option<&str>,
        options: GenerationOptions,
    ) -> Result<JobSubmission, ServiceError> {
        let text = sanitize_text(text);
        VideoClient::validate(&text)?;
        self.bus
            .publish(BusEvent::VideoProgress(ProgressEvent::starting()));

        let style = GenerationStyle::parse_or_default(style);
        let submission = self.client.submit(&text, style, options).await?;
        info!("tracking job {}", submission.job_id);

        self.store
            .set_last_job(&JobHandle::new(&submission.job_id))
            .await?;
        self.bus.publish(BusEvent::VideoProgress(ProgressEvent::submitted(
            &submission.job_id,
            submission.estimated_seconds,
        )));
        self.relay.open(&submission.job_id).await;
        Ok(submission)
    }

    /// One-shot progress snapshot, for listeners that missed the stream.
    pub async fn poll_job(&self, job_id: &str) -> Result<ProgressEvent, ServiceError> {
        let progress = self.client.poll_progress(job_id).await?;
        Ok(progress.into_event())
    }

    /// Final result for the tracked job.
    ///
    /// A job id that is not the tracked one is stale: either superseded or
    /// from an earlier daemon run.
    pub async fn job_result(&self, job_id: &str) -> Result<ResultRecord, ServiceError> {
        let tracked = self.store.last_job().await?;
        if tracked.map(|h| h.job_id) != Some(job_id.to_string()) {
            return Err(ResultError::StaleJob { requested: job_id.to_string() }.into());
        }
        Ok(self.client.fetch_result(job_id).await?)
    }

    /// Stop observing a job. The remote job keeps running.
    pub async fn cancel(&self, job_id: &str) -> bool {
        self.relay.close(job_id).await
    }

    /// Most recently persisted selection.
    pub async fn last_selection(&self) -> Result<Option<SelectionRecord>, ServiceError> {
        Ok(self.store.last_selection().await?)
    }

    /// The selection active right now: tracker cache first, then a live read
    /// through the capture agent when one is wired in.
    pub async fn active_selection(&self) -> Result<Option<SelectionRecord>, ServiceError> {
        if let Some(record) = self.tracker.respond_to_query() {
            return Ok(Some(record));
        }
        match &self.agent {
            Some(agent) => Ok(agent.active_selection().await?),
            None => Ok(None),
        }
    }

    /// Record a selection change from the capture side. Cache-only until the
    /// pointer-release commit.
    pub fn selection_changed(&self, text: &str, origin_url: &str) {
        self.tracker
            .note(text, SelectionSource::ContentScript, origin_url);
    }

    /// Pointer-release hook: cache, persist and broadcast the selection.
    pub fn selection_committed(&self, text: &str, origin_url: &str) {
        self.tracker
            .note(text, SelectionSource::ContentScript, origin_url);
        self.tracker.commit();
    }

    /// Presenter avatars offered by the service.
    pub async fn list_avatars(&self) -> Result<Vec<AvatarInfo>, ServiceError> {
        Ok(self.client.list_avatars().await?)
    }

    /// Narration voices offered by the service.
    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>, ServiceError> {
        Ok(self.client.list_voices().await?)
    }

    pub async fn preferences(&self) -> Result<UiPreferences, ServiceError> {
        Ok(self.store.preferences().await?)
    }

    pub async fn set_preferences(&self, prefs: &UiPreferences) -> Result<(), ServiceError> {
        Ok(self.store.set_preferences(prefs).await?)
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    /// Answer one UI request frame. Failures become error frames, never
    /// socket closures.
    pub async fn handle_request(&self, request: UiRequest) -> UiResponse {
        match request {
            UiRequest::GetLastSelection => match self.last_selection().await {
                Ok(selection) => UiResponse::Selection { selection },
                Err(e) => error_response(e),
            },
            UiRequest::RequestActiveSelection => match self.active_selection().await {
                Ok(selection) => UiResponse::Selection { selection },
                Err(e) => error_response(e),
            },
            UiRequest::SelectionChanged { text, origin_url } => {
                self.selection_changed(&text, &origin_url);
                UiResponse::Ack
            }
            UiRequest::SelectionCommitted { text, origin_url } => {
                self.selection_committed(&text, &origin_url);
                UiResponse::Ack
            }
            UiRequest::GenerateVideoRequest { text, style, options } => {
                match self.generate_video(&text, style.as_deref(), options).await {
                    Ok(submission) => UiResponse::JobAccepted {
                        job_id: submission.job_id,
                        estimated_seconds: submission.estimated_seconds,
                    },
                    Err(e) => error_response(e),
                }
            }
            UiRequest::PollJobProgress { job_id } => match self.poll_job(&job_id).await {
                Ok(event) => UiResponse::Progress { event },
                Err(e) => error_response(e),
            },
            UiRequest::GetJobResult { job_id } => match self.job_result(&job_id).await {
                Ok(result) => UiResponse::JobResult { result },
                Err(e) => error_response(e),
            },
            UiRequest::GetAvatars => match self.list_avatars().await {
                Ok(avatars) => UiResponse::Avatars { avatars },
                Err(e) => error_response(e),
            },
            UiRequest::GetVoices => match self.list_voices().await {
                Ok(voices) => UiResponse::Voices { voices },
                Err(e) => error_response(e),
            },
        }
    }
}

fn error_response(err: ServiceError) -> UiResponse {
    warn!("request failed: {} ({})", err, err.kind());
    UiResponse::error(&err)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
