//! # Scenecast Relay
//!
//! Observes remote generation jobs and fans normalized progress events out to
//! the bus. Prefers the service's WebSocket progress channel and degrades to
//! HTTP polling when the stream is unavailable, broken or stale. All
//! observations pass through a per-watch delivery gate that enforces
//! monotonically non-decreasing percentages and exactly one terminal event.

mod config;
mod gate;
mod relay;
mod stream;

pub use config::RelayConfig;
pub use relay::ProgressRelay;
