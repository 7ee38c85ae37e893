//! Capture agent.

use std::sync::Arc;

use tracing::{debug, info};

use scenecast_protocols::{CaptureError, SelectionRecord, SelectionSource};

use crate::host::DocumentHost;

/// Reads the active selection through a [`DocumentHost`].
///
/// A `Communication` failure usually means the collector script is gone from
/// the page, so the agent re-injects it and retries exactly once.
/// `NoActiveTarget` and `RestrictedPage` fail fast.
pub struct CaptureAgent {
    host: Arc<dyn DocumentHost>,
}

impl CaptureAgent {
    pub fn new(host: Arc<dyn DocumentHost>) -> Self {
        Self { host }
    }

    /// Read the active selection. Returns `None` when nothing usable is
    /// selected.
    pub async fn active_selection(&self) -> Result<Option<SelectionRecord>, CaptureError> {
        let raw = match self.host.read_selection().await {
            Ok(raw) => raw,
            Err(e) if e.is_retryable() => {
                info!("collector unreachable, re-injecting: {}", e);
                self.host.inject().await?;
                self.host.read_selection().await?
            }
            Err(e) => return Err(e),
        };

        if raw.trim().is_empty() {
            debug!("no active selection");
            return Ok(None);
        }
        let origin_url = self.host.origin_url().await?;
        Ok(SelectionRecord::capture(
            &raw,
            SelectionSource::ContentScript,
            origin_url,
        ))
    }
}
