//! # Scenecast Client
//!
//! HTTP client for the remote video-generation service: job submission,
//! progress polling and result fetch. No retry logic lives here — retry and
//! fallback policy belong to the relay.

mod api;
mod client;

pub use api::{JobProgressResponse, ScriptResponse, SubmitResponse, VideoResultResponse};
pub use client::VideoClient;
