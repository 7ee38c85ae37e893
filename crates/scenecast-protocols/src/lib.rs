//! # Scenecast Protocols
//!
//! Shared data model for the Scenecast companion daemon: selection records,
//! job handles, progress events, the error taxonomy, the UI message surface
//! and the broadcast event bus. No I/O lives here.

pub mod bus;
pub mod error;
pub mod job;
pub mod result;
pub mod sanitize;
pub mod selection;
pub mod surface;

pub use bus::{BusEvent, EventBus};
pub use error::{
    CaptureError, ProgressError, RelayError, ResultError, ServiceError, StoreError, SubmitError,
    ValidationError,
};
pub use job::{
    AvatarInfo, GenerationOptions, GenerationStyle, JobHandle, JobStatus, JobSubmission,
    ProgressEvent, ProgressStatus, VoiceInfo,
};
pub use result::ResultRecord;
pub use sanitize::{sanitize_text, MAX_TEXT_LEN};
pub use selection::{SelectionRecord, SelectionSource};
pub use surface::{UiBroadcast, UiPreferences, UiRequest, UiResponse};
