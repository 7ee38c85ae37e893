//! Typed access to the single-slot state records.

use std::sync::Arc;

use tracing::{debug, warn};

use scenecast_protocols::{JobHandle, JobStatus, SelectionRecord, StoreError, UiPreferences};

use crate::kv::KvStore;

const KEY_LAST_SELECTION: &str = "last-selection";
const KEY_LAST_JOB: &str = "last-job";
const KEY_PREFERENCES: &str = "ui-preferences";

/// Typed wrapper over a [`KvStore`] for the three single-slot records.
///
/// Each setter replaces the previous value; there is no history.
#[derive(Clone)]
pub struct StateStore {
    kv: Arc<dyn KvStore>,
}

impl StateStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Most recently captured selection, if any.
    pub async fn last_selection(&self) -> Result<Option<SelectionRecord>, StoreError> {
        match self.kv.get(KEY_LAST_SELECTION).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set_last_selection(&self, record: &SelectionRecord) -> Result<(), StoreError> {
        self.kv
            .put(KEY_LAST_SELECTION, serde_json::to_value(record)?)
            .await
    }

    /// Handle of the most recently submitted job, if any.
    pub async fn last_job(&self) -> Result<Option<JobHandle>, StoreError> {
        match self.kv.get(KEY_LAST_JOB).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set_last_job(&self, handle: &JobHandle) -> Result<(), StoreError> {
        self.kv.put(KEY_LAST_JOB, serde_json::to_value(handle)?).await
    }

    /// Update the stored job's status. Ignored when the stored handle
    /// belongs to a different job, so a superseded watcher cannot clobber
    /// the record of its successor.
    pub async fn set_job_status(&self, job_id: &str, status: JobStatus) -> Result<(), StoreError> {
        let Some(mut handle) = self.last_job().await? else {
            debug!("no stored job, skipping status update for {}", job_id);
            return Ok(());
        };
        if handle.job_id != job_id {
            warn!(
                "stored job {} does not match {}, skipping status update",
                handle.job_id, job_id
            );
            return Ok(());
        }
        handle.status = status;
        self.set_last_job(&handle).await
    }

    pub async fn preferences(&self) -> Result<UiPreferences, StoreError> {
        match self.kv.get(KEY_PREFERENCES).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(UiPreferences::default()),
        }
    }

    pub async fn set_preferences(&self, prefs: &UiPreferences) -> Result<(), StoreError> {
        self.kv
            .put(KEY_PREFERENCES, serde_json::to_value(prefs)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use scenecast_protocols::SelectionSource;

    fn store() -> StateStore {
        StateStore::new(Arc::new(MemoryKvStore::new()))
    }

    #[tokio::test]
    async fn test_empty_store_defaults() {
        let state = store();
        assert!(state.last_selection().await.unwrap().is_none());
        assert!(state.last_job().await.unwrap().is_none());
        assert_eq!(state.preferences().await.unwrap(), UiPreferences::default());
    }

    #[tokio::test]
    async fn test_last_selection_roundtrip() {
        let state = store();
        let record =
            SelectionRecord::capture("photosynthesis", SelectionSource::ContextMenu, "https://example.org")
                .unwrap();
        state.set_last_selection(&record).await.unwrap();

        let back = state.last_selection().await.unwrap().unwrap();
        assert_eq!(back.text, "photosynthesis");
        assert_eq!(back.source, SelectionSource::ContextMenu);
    }

    #[tokio::test]
    async fn test_set_job_status_matching_id() {
        let state = store();
        state.set_last_job(&JobHandle::new("j1")).await.unwrap();
        state.set_job_status("j1", JobStatus::Completed).await.unwrap();

        let handle = state.last_job().await.unwrap().unwrap();
        assert_eq!(handle.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_set_job_status_mismatched_id_is_noop() {
        let state = store();
        state.set_last_job(&JobHandle::new("j2")).await.unwrap();
        state.set_job_status("j1", JobStatus::Failed).await.unwrap();

        let handle = state.last_job().await.unwrap().unwrap();
        assert_eq!(handle.job_id, "j2");
        assert_eq!(handle.status, JobStatus::Queued);
    }

    #[tokio::test]
    async fn test_set_job_status_without_job_is_noop() {
        let state = store();
        state.set_job_status("j1", JobStatus::Failed).await.unwrap();
        assert!(state.last_job().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_preferences_roundtrip() {
        let state = store();
        let prefs = UiPreferences {
            dark_mode: true,
            ..UiPreferences::default()
        };
        state.set_preferences(&prefs).await.unwrap();
        assert!(state.preferences().await.unwrap().dark_mode);
    }
}
