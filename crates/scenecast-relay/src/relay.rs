//! Watch registry and observation loops.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use scenecast_client::VideoClient;
use scenecast_protocols::{EventBus, ProgressError, ProgressEvent, ProgressStatus};
use scenecast_store::StateStore;

use crate::config::RelayConfig;
use crate::gate::DeliveryGate;
use crate::stream::JobStream;

struct WatchHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatchHandle {
    fn shutdown(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Owns one watcher task per observed job.
///
/// At most one job is observed at a time: `open` supersedes any existing
/// watch, and a superseded job id never produces another event.
pub struct ProgressRelay {
    client: VideoClient,
    bus: EventBus,
    store: StateStore,
    config: RelayConfig,
    watches: Mutex<HashMap<String, WatchHandle>>,
}

impl ProgressRelay {
    pub fn new(client: VideoClient, bus: EventBus, store: StateStore, config: RelayConfig) -> Self {
        Self {
            client,
            bus,
            store,
            config,
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Start observing a job, superseding any existing watch.
    pub async fn open(&self, job_id: &str) {
        let mut watches = self.watches.lock().await;
        for (old_id, handle) in watches.drain() {
            info!("superseding watch on {} with {}", old_id, job_id);
            handle.shutdown();
        }

        let cancel = CancellationToken::new();
        let gate = Arc::new(SyncMutex::new(DeliveryGate::new(
            job_id,
            self.bus.clone(),
            self.store.clone(),
            cancel.clone(),
        )));
        let ws_url = match self.client.ws_url(job_id) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("no stream channel available: {}", e);
                None
            }
        };
        let task = tokio::spawn(run_watch(
            self.client.clone(),
            job_id.to_string(),
            ws_url,
            gate,
            self.config.clone(),
            cancel.clone(),
        ));
        watches.insert(job_id.to_string(), WatchHandle { cancel, task });
    }

    /// Stop observing a job. Returns whether a watch existed.
    ///
    /// Only the local watch is torn down; the remote job keeps running.
    pub async fn close(&self, job_id: &str) -> bool {
        let mut watches = self.watches.lock().await;
        match watches.remove(job_id) {
            Some(handle) => {
                handle.shutdown();
                true
            }
            None => false,
        }
    }

    /// Tear down every watch.
    pub async fn close_all(&self) {
        let mut watches = self.watches.lock().await;
        for (_, handle) in watches.drain() {
            handle.shutdown();
        }
    }

    /// Number of live watcher tasks.
    pub async fn watch_count(&self) -> usize {
        let watches = self.watches.lock().await;
        watches.values().filter(|h| !h.task.is_finished()).count()
    }
}

/// One job observation, stream-first with poll fallback.
pub(crate) async fn run_watch(
    client: VideoClient,
    job_id: String,
    ws_url: Option<Url>,
    gate: Arc<SyncMutex<DeliveryGate>>,
    config: RelayConfig,
    cancel: CancellationToken,
) {
    if let Some(url) = ws_url {
        match JobStream::connect(&url, config.connect_timeout).await {
            Ok(stream) => {
                run_streaming(stream, &client, &job_id, &gate, &config, &cancel).await;
                return;
            }
            Err(e) => {
                debug!("stream unavailable for {}, polling: {}", job_id, e);
            }
        }
    }
    run_polling(&client, &job_id, &gate, &config, &cancel).await;
}

/// Streaming loop. Degrades to polling on close, error or failed heartbeat;
/// engages polling *in parallel* when the stream goes quiet past the
/// staleness window, keeping the stream open in case it recovers.
async fn run_streaming(
    mut stream: JobStream,
    client: &VideoClient,
    job_id: &str,
    gate: &Arc<SyncMutex<DeliveryGate>>,
    config: &RelayConfig,
    cancel: &CancellationToken,
) {
    let mut poll_task: Option<JoinHandle<()>> = None;
    let mut heartbeat = tokio::time::interval_at(
        tokio::time::Instant::now() + config.heartbeat_interval,
        config.heartbeat_interval,
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = heartbeat.tick() => {
                if let Err(e) = stream.send_heartbeat().await {
                    warn!("heartbeat failed for {}: {}", job_id, e);
                    ensure_polling(&mut poll_task, client, job_id, gate, config, cancel);
                    break;
                }
            }
            frame = tokio::time::timeout(config.staleness_window, stream.next_frame()) => {
                match frame {
                    Err(_elapsed) => {
                        debug!("stream stale for {}, engaging poll fallback", job_id);
                        ensure_polling(&mut poll_task, client, job_id, gate, config, cancel);
                    }
                    Ok(Ok(Some(frame))) => {
                        if let Some(event) = frame.into_event(job_id) {
                            gate.lock().deliver(event);
                        }
                    }
                    Ok(Ok(None)) => {
                        debug!("stream closed for {}, polling", job_id);
                        ensure_polling(&mut poll_task, client, job_id, gate, config, cancel);
                        break;
                    }
                    Ok(Err(e)) => {
                        warn!("stream error for {}: {}", job_id, e);
                        ensure_polling(&mut poll_task, client, job_id, gate, config, cancel);
                        break;
                    }
                }
            }
        }
    }

    if let Some(task) = poll_task {
        // The poll loop exits on its own once the watch is cancelled.
        let _ = task.await;
    }
}

fn ensure_polling(
    poll_task: &mut Option<JoinHandle<()>>,
    client: &VideoClient,
    job_id: &str,
    gate: &Arc<SyncMutex<DeliveryGate>>,
    config: &RelayConfig,
    cancel: &CancellationToken,
) {
    if poll_task.as_ref().is_some_and(|t| !t.is_finished()) {
        return;
    }
    let client = client.clone();
    let job_id = job_id.to_string();
    let gate = Arc::clone(gate);
    let config = config.clone();
    let cancel = cancel.clone();
    *poll_task = Some(tokio::spawn(async move {
        run_polling(&client, &job_id, &gate, &config, &cancel).await;
    }));
}

/// Bounded poll loop. Transient failures are swallowed; `JobNotFound` and
/// attempt exhaustion are terminal.
async fn run_polling(
    client: &VideoClient,
    job_id: &str,
    gate: &Arc<SyncMutex<DeliveryGate>>,
    config: &RelayConfig,
    cancel: &CancellationToken,
) {
    for attempt in 1..=config.max_poll_attempts {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(config.poll_interval) => {}
        }
        match client.poll_progress(job_id).await {
            Ok(progress) => {
                let event = progress.into_event();
                let mut gate = gate.lock();
                gate.deliver(event);
                if gate.terminal_sent() {
                    return;
                }
            }
            Err(ProgressError::JobNotFound(_)) => {
                info!("job {} no longer known to the service", job_id);
                gate.lock().deliver(ProgressEvent {
                    job_id: Some(job_id.to_string()),
                    step: "error".to_string(),
                    status: ProgressStatus::Failed,
                    message: "Job not found".to_string(),
                    percent: None,
                });
                return;
            }
            Err(e) => {
                debug!("poll attempt {} for {} failed: {}", attempt, job_id, e);
            }
        }
    }

    let timeout = ProgressError::Timeout { attempts: config.max_poll_attempts };
    gate.lock()
        .deliver(ProgressEvent::local_error(job_id, timeout.to_string()));
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
