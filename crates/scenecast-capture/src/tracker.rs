//! Selection tracking.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use scenecast_protocols::{BusEvent, EventBus, SelectionRecord, SelectionSource};
use scenecast_store::StateStore;

/// Caches the latest selection so queries never touch the document.
///
/// Change notifications arrive at pointer-move frequency; `note` must stay
/// cheap, so persistence happens only on `commit` (the pointer-release hook)
/// and is fire-and-forget.
#[derive(Clone)]
pub struct SelectionTracker {
    current: Arc<RwLock<Option<SelectionRecord>>>,
    store: StateStore,
    bus: EventBus,
}

impl SelectionTracker {
    pub fn new(store: StateStore, bus: EventBus) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
            bus,
        }
    }

    /// Record a selection change. Empty selections clear the cache without
    /// touching the persisted slot.
    pub fn note(&self, raw_text: &str, source: SelectionSource, origin_url: &str) {
        let record = SelectionRecord::capture(raw_text, source, origin_url);
        if record.is_none() {
            debug!("selection cleared");
        }
        *self.current.write() = record;
    }

    /// Latest cached selection, if any.
    pub fn current(&self) -> Option<SelectionRecord> {
        self.current.read().clone()
    }

    /// Answer a UI query for the active selection from the cache.
    pub fn respond_to_query(&self) -> Option<SelectionRecord> {
        self.current()
    }

    /// Persist the cached selection and announce it on the bus.
    ///
    /// Storage failures are logged, never surfaced: losing the persisted copy
    /// must not interrupt the selection flow.
    pub fn commit(&self) {
        let Some(record) = self.current() else {
            return;
        };
        self.bus.publish(BusEvent::SelectionUpdated(record.clone()));

        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(e) = store.set_last_selection(&record).await {
                warn!("failed to persist selection: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecast_store::{MemoryKvStore, StateStore};

    fn tracker() -> (SelectionTracker, EventBus, StateStore) {
        let store = StateStore::new(Arc::new(MemoryKvStore::new()));
        let bus = EventBus::default();
        (
            SelectionTracker::new(store.clone(), bus.clone()),
            bus,
            store,
        )
    }

    #[tokio::test]
    async fn test_note_then_current() {
        let (tracker, _bus, _store) = tracker();
        tracker.note("mitosis", SelectionSource::ContentScript, "https://a.example");

        let record = tracker.current().unwrap();
        assert_eq!(record.text, "mitosis");
        assert_eq!(record.source, SelectionSource::ContentScript);
    }

    #[tokio::test]
    async fn test_empty_note_clears_cache() {
        let (tracker, _bus, _store) = tracker();
        tracker.note("mitosis", SelectionSource::ContentScript, "https://a.example");
        tracker.note("   ", SelectionSource::ContentScript, "https://a.example");
        assert!(tracker.current().is_none());
    }

    #[tokio::test]
    async fn test_commit_publishes_and_persists() {
        let (tracker, bus, store) = tracker();
        let mut rx = bus.subscribe();

        tracker.note("osmosis", SelectionSource::ContextMenu, "https://b.example");
        tracker.commit();

        match rx.recv().await.unwrap() {
            BusEvent::SelectionUpdated(record) => assert_eq!(record.text, "osmosis"),
            other => panic!("unexpected event: {other:?}"),
        }

        // The store write is spawned; wait for it to land.
        let mut persisted = None;
        for _ in 0..50 {
            persisted = store.last_selection().await.unwrap();
            if persisted.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(persisted.unwrap().text, "osmosis");
    }

    #[tokio::test]
    async fn test_commit_without_selection_is_noop() {
        let (tracker, bus, store) = tracker();
        tracker.commit();
        assert_eq!(bus.listener_count(), 0);
        assert!(store.last_selection().await.unwrap().is_none());
    }
}
