//! Document host seam.

use async_trait::async_trait;

use scenecast_protocols::CaptureError;

/// Access to the document currently in front of the user.
///
/// Implementations wrap whatever surface renders the page. The agent assumes
/// the collector script inside the host can disappear at any time (navigation,
/// host restart), surfacing as [`CaptureError::Communication`].
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Read the current selection text from the active document, raw.
    ///
    /// An empty string means nothing is selected; that is not an error.
    async fn read_selection(&self) -> Result<String, CaptureError>;

    /// (Re-)inject the selection collector into the active document.
    async fn inject(&self) -> Result<(), CaptureError>;

    /// URL of the active document, for selection provenance.
    async fn origin_url(&self) -> Result<String, CaptureError>;
}
