//! The automation-session seam.
//!
//! The harness core never talks to a WebDriver client directly; it goes
//! through [`Session`] so the same page logic runs against the live
//! providers in [`crate::provider`] and against scripted fakes in tests.

use async_trait::async_trait;

use crate::locator::Locator;

/// A driver-level failure (connection lost, command rejected, session
/// already torn down). Distinct from the harness's own wait timeouts.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct SessionError(pub String);

/// Snapshot of one element's state from a single, non-blocking page probe.
#[derive(Debug)]
pub struct Probe<E> {
    pub element: E,
    pub visible: bool,
    pub interactable: bool,
}

/// One exclusive browser automation session.
///
/// All methods are single attempts; polling and timeouts live in
/// [`crate::Interactor`]. `close` consumes the session, so ownership makes
/// double-teardown unrepresentable.
#[async_trait]
pub trait Session: Send + Sync {
    type Element: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Look for the locator once. `Ok(None)` means "not on the page right
    /// now", which is not an error.
    async fn probe(&self, locator: &Locator) -> Result<Option<Probe<Self::Element>>, SessionError>;

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    async fn clear(&self, element: &Self::Element) -> Result<(), SessionError>;

    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<(), SessionError>;

    /// Send the Enter key to the element (keystroke-based form submission).
    async fn press_enter(&self, element: &Self::Element) -> Result<(), SessionError>;

    /// Scroll the viewport vertically by `dy` pixels.
    async fn scroll_by(&self, dy: i64) -> Result<(), SessionError>;

    /// Whether the document reports itself fully loaded.
    async fn document_ready(&self) -> Result<bool, SessionError>;

    /// PNG screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, SessionError>;

    /// Rendered page markup.
    async fn page_source(&self) -> Result<String, SessionError>;

    async fn current_url(&self) -> Result<String, SessionError>;

    async fn title(&self) -> Result<String, SessionError>;

    /// Tear the session down, releasing the browser.
    async fn close(self) -> Result<(), SessionError>;
}
