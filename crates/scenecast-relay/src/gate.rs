//! Per-watch delivery gate.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use scenecast_protocols::{BusEvent, EventBus, JobStatus, ProgressEvent};
use scenecast_store::StateStore;

/// Serializes every observation for one watch before it reaches the bus.
///
/// Stream and poll observations may race; the gate guarantees what listeners
/// see: percentages never decrease, and exactly one terminal event is
/// delivered per job id. The first terminal observation cancels the watch
/// token, tearing down both observation paths.
///
/// Status persistence goes through a single writer task fed in delivery
/// order, so the stored handle settles on the last delivered status: a
/// terminal write cannot be overwritten by an earlier observation landing
/// late.
pub(crate) struct DeliveryGate {
    job_id: String,
    bus: EventBus,
    status_tx: mpsc::UnboundedSender<JobStatus>,
    cancel: CancellationToken,
    high_water: u8,
    terminal_sent: bool,
}

impl DeliveryGate {
    pub(crate) fn new(
        job_id: impl Into<String>,
        bus: EventBus,
        store: StateStore,
        cancel: CancellationToken,
    ) -> Self {
        let job_id = job_id.into();
        let (status_tx, mut status_rx) = mpsc::unbounded_channel::<JobStatus>();
        let writer_job = job_id.clone();
        tokio::spawn(async move {
            while let Some(status) = status_rx.recv().await {
                if let Err(e) = store.set_job_status(&writer_job, status).await {
                    warn!("failed to persist status for {}: {}", writer_job, e);
                }
            }
        });
        Self {
            job_id,
            bus,
            status_tx,
            cancel,
            high_water: 0,
            terminal_sent: false,
        }
    }

    /// Deliver an observation. Returns `false` when suppressed.
    pub(crate) fn deliver(&mut self, mut event: ProgressEvent) -> bool {
        if self.terminal_sent {
            debug!("suppressing observation after terminal for {}", self.job_id);
            return false;
        }
        event.job_id = Some(self.job_id.clone());

        // A late or out-of-order observation may carry a lower percent than
        // one already delivered; clamp rather than drop, the step and message
        // are still fresh.
        if let Some(p) = event.percent {
            if p < self.high_water {
                event.percent = Some(self.high_water);
            } else {
                self.high_water = p;
            }
        }

        if self.status_tx.send(JobStatus::from(event.status)).is_err() {
            debug!("status writer gone for {}", self.job_id);
        }

        let terminal = event.is_terminal();
        self.bus.publish(BusEvent::VideoProgress(event));

        if terminal {
            self.terminal_sent = true;
            self.cancel.cancel();
        }
        true
    }

    pub(crate) fn terminal_sent(&self) -> bool {
        self.terminal_sent
    }
}
