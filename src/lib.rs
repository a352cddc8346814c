//! # wapcheck
//!
//! Resilient mobile-web UI check for the Twitch WAP search flow. Drives a
//! WebDriver session (Chrome mobile emulation or an Appium-proxied device)
//! through navigate → search → scroll → select → dismiss-gate → screenshot,
//! and asserts the final URL stayed on the expected domain.
//!
//! Element lookup goes through ordered locator fallback chains so small DOM
//! changes on the site degrade into logged fallbacks instead of failures,
//! and a failing run leaves a screenshot, a markup snapshot, and a metadata
//! file behind for diagnosis.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wapcheck::{Provider, RunOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> wapcheck::Result<()> {
//! let session = Provider::Emulation { headless: true }.connect().await?;
//! let report = wapcheck::scenario::run(session, &RunOptions::default()).await;
//! println!("Success: {}", report.success);
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
mod interact;
mod locator;
pub mod pages;
mod provider;
pub mod scenario;
mod session;

pub use artifacts::{ArtifactSet, CaptureOutcome};
pub use interact::Interactor;
pub use locator::{Locator, Strategy, Target};
pub use provider::{Provider, WebSession};
pub use scenario::{RunOptions, RunReport};
pub use session::{Probe, Session, SessionError};

/// Result type for wapcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the scenario.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single locator never became present within the wait timeout.
    #[error("element not found: {locator}")]
    ElementNotFound { locator: Locator },

    /// A single locator never became visible/clickable within the wait timeout.
    #[error("element not interactable: {locator}")]
    ElementNotInteractable { locator: Locator },

    /// Every candidate locator for a logical target failed.
    #[error("target '{target}' unreachable after {attempts} locator attempts")]
    TargetUnreachable {
        target: &'static str,
        attempts: usize,
    },

    /// The mandatory search entry point could not be resolved.
    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
