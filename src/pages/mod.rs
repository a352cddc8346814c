//! Page abstractions for the two screens the scenario touches.

mod home;
mod streamer;

pub use home::{HomePage, ENTRY_URL};
pub use streamer::{StreamerPage, SCREENSHOT_NAME};

use std::time::Duration;

/// Settle delay after the document reports ready. Initial paint on the
/// mobile site lags readyState, and there is no usable signal for it.
pub(crate) const RENDER_SETTLE: Duration = Duration::from_millis(250);
