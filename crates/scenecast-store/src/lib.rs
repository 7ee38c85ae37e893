//! # Scenecast Store
//!
//! Durable key-value storage surviving daemon restarts. Holds the three
//! single-slot records: last selection, last job handle and UI preferences.

mod kv;
mod state;

pub use kv::{FileKvStore, KvStore, MemoryKvStore};
pub use state::StateStore;
