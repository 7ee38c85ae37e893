//! # Scenecast Capture
//!
//! Tracks the user's active text selection and reads it back on demand.
//! The [`DocumentHost`] trait is the seam to whatever renders the document;
//! the agent layers a retry-once re-injection policy over it.

mod agent;
mod host;
mod tracker;

pub use agent::CaptureAgent;
pub use host::DocumentHost;
pub use tracker::SelectionTracker;
