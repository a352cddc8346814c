//! The content (streamer) screen: scroll, card selection, content gate,
//! and the final screenshot.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::artifacts::{self, CaptureOutcome};
use crate::interact::Interactor;
use crate::locator::{Locator, Target};
use crate::session::Session;
use crate::Result;

/// Name of the screenshot taken at the end of the flow.
pub const SCREENSHOT_NAME: &str = "streamer_page";

/// Per-scroll viewport delta in pixels.
const SCROLL_PIXELS: i64 = 500;

mod selectors {
    pub const FIRST_CARD: &str =
        r#"//*[@id="page-main-content-wrapper"]/div/div/section[1]/div[2]/button"#;
    pub const FIRST_CARD_ANY: &str = "(//div[contains(@class,'tw-link')])[1]";

    pub const GATE_CONFIRM: &str =
        r#"button[data-a-target="content-classification-gate-overlay-start-watching-button"]"#;
    pub const VIDEO: &str = "video";
}

fn first_card() -> Target {
    Target::new(
        "first streamer card",
        vec![
            Locator::xpath(selectors::FIRST_CARD),
            Locator::xpath(selectors::FIRST_CARD_ANY),
        ],
    )
}

fn gate_confirm() -> Target {
    Target::new(
        "content gate confirm",
        vec![Locator::css(selectors::GATE_CONFIRM)],
    )
}

fn video_player() -> Target {
    Target::new("video player", vec![Locator::tag(selectors::VIDEO)])
}

/// The screen reached after searching: result cards, then a channel page
/// with an optional content-classification gate over the player.
pub struct StreamerPage<'a, S: Session> {
    session: &'a S,
    interact: Interactor,
}

impl<'a, S: Session> StreamerPage<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self::with_interactor(session, Interactor::default())
    }

    pub fn with_interactor(session: &'a S, interact: Interactor) -> Self {
        Self { session, interact }
    }

    /// Scroll `times` viewports down, pausing after each so lazy content
    /// can load (no load signal exists for the feed), then click the first
    /// streamer card through its fallback chain.
    pub async fn scroll_and_select_first(&self, times: usize, pause: Duration) -> Result<()> {
        for i in 0..times {
            debug!(scroll = i + 1, total = times, "scrolling for lazy content");
            self.interact.scroll(self.session, SCROLL_PIXELS).await;
            tokio::time::sleep(pause).await;
        }
        info!("selecting first streamer card");
        self.interact.click_target(self.session, &first_card()).await
    }

    /// Dismiss the mature-content/start-watching gate if present (absence
    /// is the common case and not an error), best-effort check that the
    /// video player showed up, then always take the named screenshot.
    pub async fn dismiss_gate_and_capture(&self, screenshots_dir: &Path) -> Result<()> {
        match self.interact.click_target(self.session, &gate_confirm()).await {
            Ok(()) => info!("content gate dismissed"),
            Err(e) => info!(error = %e, "no content gate appeared"),
        }

        match self.interact.find_target(self.session, &video_player()).await {
            Ok(_) => debug!("video player present"),
            Err(e) => warn!(error = %e, "video player did not appear"),
        }

        match artifacts::save_screenshot(self.session, screenshots_dir, SCREENSHOT_NAME).await {
            CaptureOutcome::Written(path) => info!(path = %path.display(), "saved screenshot"),
            CaptureOutcome::Failed(reason) => warn!(%reason, "failed to save screenshot"),
        }
        Ok(())
    }
}
