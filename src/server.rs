//! UI surface server.
//!
//! A small axum server exposing `/health` and the `/ws` message surface. UI
//! clients are ephemeral: each socket gets every bus broadcast for as long as
//! it stays attached and may interleave request frames at any time.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scenecast_capture::SelectionTracker;
use scenecast_client::VideoClient;
use scenecast_protocols::{EventBus, UiBroadcast, UiRequest, UiResponse};
use scenecast_relay::ProgressRelay;
use scenecast_store::{FileKvStore, StateStore};

use crate::config::{scenecast_dir, AppConfig};
use crate::service::CoreService;

/// Shared server state.
pub struct AppState {
    pub service: CoreService,
    pub bus: EventBus,
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.scenecast/debug/ with daily rotation.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = scenecast_dir().join("debug");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("scenecast")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Keep the appender guard alive for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(_guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Wire up the service graph and run the server until shutdown.
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Scenecast v{}", env!("CARGO_PKG_VERSION"));
    info!("Generation service: {}", config.service.base_url);

    let bus = EventBus::default();
    let state_dir = config.storage.resolved_state_dir();
    let kv = Arc::new(FileKvStore::new(&state_dir).await?);
    let store = StateStore::new(kv);
    info!("State directory: {}", state_dir.display());

    let client = VideoClient::new(config.service.base_url.clone());
    let relay = Arc::new(ProgressRelay::new(
        client.clone(),
        bus.clone(),
        store.clone(),
        config.relay.clone(),
    ));
    let tracker = SelectionTracker::new(store.clone(), bus.clone());
    let service = CoreService::new(bus.clone(), store, client, relay, tracker, None);

    let state = Arc::new(AppState { service, bus });
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Scenecast ready:");
    info!("  UI surface:  ws://{}/ws", addr);
    info!("  Health:      http://{}/health", addr);
    axum::serve(listener, app).await?;

    info!("Shutting down...");
    Ok(())
}

/// Create the axum router for the UI surface.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "listeners": state.bus.listener_count(),
    }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Per-socket loop: forward bus broadcasts, answer request frames.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    debug!("UI client attached: {}", conn_id);
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.bus.subscribe();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let frame = UiBroadcast::from(event);
                    if send_json(&mut sender, &frame).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Delivery is at-least-once, not lossless; a slow client
                    // just misses intermediate events.
                    warn!("UI client lagged, {} events dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let response = match serde_json::from_str::<UiRequest>(&text) {
                        Ok(request) => state.service.handle_request(request).await,
                        Err(e) => {
                            debug!("unrecognized request frame: {}", e);
                            UiResponse::Error {
                                kind: "UNEXPECTED_ERROR".to_string(),
                                message: format!("unrecognized request: {e}"),
                            }
                        }
                    };
                    if send_json(&mut sender, &response).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("UI socket error: {}", e);
                    break;
                }
            },
        }
    }
    debug!("UI client detached: {}", conn_id);
}

async fn send_json<S, T>(sender: &mut S, value: &T) -> Result<(), ()>
where
    S: futures::Sink<Message> + Unpin,
    T: serde::Serialize,
{
    let text = match serde_json::to_string(value) {
        Ok(text) => text,
        Err(e) => {
            error!("failed to encode frame: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(text.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecast_store::MemoryKvStore;
    use url::Url;

    fn test_state() -> Arc<AppState> {
        let bus = EventBus::default();
        let store = StateStore::new(Arc::new(MemoryKvStore::new()));
        let client = VideoClient::new(Url::parse("http://127.0.0.1:1").unwrap());
        let relay = Arc::new(ProgressRelay::new(
            client.clone(),
            bus.clone(),
            store.clone(),
            Default::default(),
        ));
        let tracker = SelectionTracker::new(store.clone(), bus.clone());
        let service = CoreService::new(bus.clone(), store, client, relay, tracker, None);
        Arc::new(AppState { service, bus })
    }

    #[tokio::test]
    async fn test_create_router() {
        let _router = create_router(test_state());
    }
}
