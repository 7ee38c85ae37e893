//! Scenecast daemon: wiring between the capture, client, relay and store
//! crates, the core service facade, and the UI-facing WebSocket server.

pub mod config;
pub mod server;
pub mod service;
