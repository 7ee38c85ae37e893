//! Error taxonomy.
//!
//! Every error carries a stable machine-readable kind (see `kind()` on each
//! enum) plus a human-readable message, so UI code can branch on kind without
//! string matching.

mod capture;
mod relay;
mod remote;
mod service;
mod store;
mod validation;

pub use capture::CaptureError;
pub use relay::RelayError;
pub use remote::{ProgressError, ResultError, SubmitError};
pub use service::ServiceError;
pub use store::StoreError;
pub use validation::ValidationError;
