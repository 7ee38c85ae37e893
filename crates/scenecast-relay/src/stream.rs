//! WebSocket progress channel.

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};
use url::Url;

use scenecast_protocols::{ProgressEvent, ProgressStatus, RelayError};

/// Frames the service pushes on `/ws/job/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum StreamFrame {
    Connected {
        #[serde(default)]
        job_id: Option<String>,
    },
    Progress {
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        progress_percent: Option<u8>,
        #[serde(default)]
        current_step: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Complete {
        #[serde(default)]
        message: Option<String>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
    Pong,
}

impl StreamFrame {
    /// Normalize a frame into a progress observation.
    ///
    /// `Connected` and `Pong` are channel bookkeeping, not observations.
    pub(crate) fn into_event(self, job_id: &str) -> Option<ProgressEvent> {
        match self {
            StreamFrame::Connected { .. } | StreamFrame::Pong => None,
            StreamFrame::Progress {
                status,
                progress_percent,
                current_step,
                message,
            } => {
                let status = ProgressStatus::parse(status.as_deref().unwrap_or("processing"));
                let step =
                    current_step.unwrap_or_else(|| format!("{status:?}").to_lowercase());
                Some(ProgressEvent {
                    job_id: Some(job_id.to_string()),
                    step,
                    status,
                    message: message.unwrap_or_default(),
                    percent: progress_percent,
                })
            }
            StreamFrame::Complete { message } => Some(ProgressEvent {
                job_id: Some(job_id.to_string()),
                step: "completed".to_string(),
                status: ProgressStatus::Completed,
                message: message.unwrap_or_else(|| "Video ready".to_string()),
                percent: Some(100),
            }),
            StreamFrame::Error { message } => Some(ProgressEvent {
                job_id: Some(job_id.to_string()),
                step: "error".to_string(),
                status: ProgressStatus::Error,
                message: message.unwrap_or_else(|| "Generation failed".to_string()),
                percent: None,
            }),
        }
    }
}

/// An open progress stream for one job.
pub(crate) struct JobStream {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl JobStream {
    /// Connect within the given budget.
    pub(crate) async fn connect(
        url: &Url,
        timeout: std::time::Duration,
    ) -> Result<Self, RelayError> {
        let connect = connect_async(url.as_str());
        let (ws, _response) = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| RelayError::Connect(format!("timed out connecting to {url}")))?
            .map_err(|e| RelayError::Connect(e.to_string()))?;
        debug!("progress stream connected: {}", url);
        Ok(Self { ws })
    }

    /// Next parseable frame, or `None` once the stream is closed.
    ///
    /// Unparseable text and non-text messages are skipped, not fatal.
    pub(crate) async fn next_frame(&mut self) -> Result<Option<StreamFrame>, RelayError> {
        loop {
            let message = match self.ws.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => return Err(RelayError::WebSocket(e.to_string())),
                None => return Ok(None),
            };
            match message {
                Message::Text(text) => match serde_json::from_str::<StreamFrame>(&text) {
                    Ok(frame) => return Ok(Some(frame)),
                    Err(e) => {
                        trace!("skipping unparseable frame: {}", e);
                    }
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
    }

    /// Send the application-level heartbeat the service expects.
    pub(crate) async fn send_heartbeat(&mut self) -> Result<(), RelayError> {
        self.ws
            .send(Message::Text("ping".into()))
            .await
            .map_err(|e| RelayError::WebSocket(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_frame_into_event() {
        let frame: StreamFrame = serde_json::from_str(
            r#"{"type":"progress","status":"rendering","progress_percent":60,"current_step":"rendering","message":"Scene 2"}"#,
        )
        .unwrap();
        let event = frame.into_event("j1").unwrap();
        assert_eq!(event.status, ProgressStatus::Rendering);
        assert_eq!(event.percent, Some(60));
        assert_eq!(event.job_id.as_deref(), Some("j1"));
    }

    #[test]
    fn test_complete_frame_is_terminal_full_percent() {
        let frame: StreamFrame = serde_json::from_str(r#"{"type":"complete"}"#).unwrap();
        let event = frame.into_event("j1").unwrap();
        assert!(event.is_terminal());
        assert_eq!(event.percent, Some(100));
    }

    #[test]
    fn test_connected_and_pong_are_not_observations() {
        let frame: StreamFrame =
            serde_json::from_str(r#"{"type":"connected","job_id":"j1"}"#).unwrap();
        assert!(frame.into_event("j1").is_none());
        let frame: StreamFrame = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert!(frame.into_event("j1").is_none());
    }

    #[test]
    fn test_error_frame_defaults_message() {
        let frame: StreamFrame = serde_json::from_str(r#"{"type":"error"}"#).unwrap();
        let event = frame.into_event("j1").unwrap();
        assert_eq!(event.status, ProgressStatus::Error);
        assert!(!event.message.is_empty());
    }

    #[test]
    fn test_unknown_status_maps_to_processing() {
        let frame: StreamFrame = serde_json::from_str(
            r#"{"type":"progress","status":"generating_storyboard","progress_percent":30}"#,
        )
        .unwrap();
        let event = frame.into_event("j1").unwrap();
        assert_eq!(event.status, ProgressStatus::Processing);
        assert!(!event.is_terminal());
    }
}
