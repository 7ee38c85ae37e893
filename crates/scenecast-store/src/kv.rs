//! Key-value persistence.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use scenecast_protocols::StoreError;

/// Key-value store trait.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value by key.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value, replacing any previous one.
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove a value.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for testing.
pub struct MemoryKvStore {
    entries: tokio::sync::RwLock<HashMap<String, Value>>,
}

impl MemoryKvStore {
    /// Create a new memory store.
    pub fn new() -> Self {
        Self {
            entries: tokio::sync::RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON file per key under a state directory.
///
/// ```text
/// {state_dir}/
/// ├── last-selection.json
/// ├── last-job.json
/// └── ui-preferences.json
/// ```
pub struct FileKvStore {
    state_dir: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at `state_dir`, creating the directory if
    /// needed.
    pub async fn new(state_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir)
            .await
            .map_err(|e| StoreError::Io(format!("failed to create state dir: {e}")))?;
        debug!("FileKvStore initialized at {:?}", state_dir);
        Ok(Self { state_dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.key_path(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(format!("failed to read {path:?}: {e}"))),
        }
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.key_path(key);
        let content = serde_json::to_string_pretty(&value)?;
        fs::write(&path, content)
            .await
            .map_err(|e| StoreError::Io(format!("failed to write {path:?}: {e}")))?;
        debug!("Saved '{}' to {:?}", key, path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(format!("failed to remove {path:?}: {e}"))),
        }
    }
}
