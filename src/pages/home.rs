//! The home (entry) screen: navigation and search.

use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::RENDER_SETTLE;
use crate::interact::Interactor;
use crate::locator::{Locator, Target};
use crate::session::Session;
use crate::{Error, Result};

/// Entry URL. The explicit `/home` path loads the home feed instead of
/// redirecting to a channel.
pub const ENTRY_URL: &str = "https://m.twitch.tv/home";

/// Selectors change frequently on the mobile site; each logical target
/// carries fallbacks, most stable first.
mod selectors {
    pub const SEARCH_LINK: &str = r#"a[href="/directory"]"#;
    pub const SEARCH_BUTTON: &str = r#"button[aria-label="Search"]"#;
    pub const SEARCH_ANY: &str = "//*[contains(translate(@aria-label, 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), 'search') or @href='/search' or @data-a-target='search-button']";

    pub const SEARCH_INPUT: &str = r#"input[type="search"]"#;
    pub const SEARCH_INPUT_LABELLED: &str =
        r#"//input[contains(@placeholder, "Search") or contains(@aria-label, "Search")]"#;
    pub const SEARCH_INPUT_ANY: &str =
        "//input[contains(@placeholder, 'search') or contains(@placeholder, 'Search') or @type='search']";
}

fn search_entry() -> Target {
    Target::new(
        "search entry point",
        vec![
            Locator::css(selectors::SEARCH_LINK),
            Locator::css(selectors::SEARCH_BUTTON),
            Locator::xpath(selectors::SEARCH_ANY),
        ],
    )
}

fn search_input() -> Target {
    Target::new(
        "search input",
        vec![
            Locator::css(selectors::SEARCH_INPUT),
            Locator::xpath(selectors::SEARCH_INPUT_LABELLED),
            Locator::xpath(selectors::SEARCH_INPUT_ANY),
        ],
    )
}

/// The entry screen of the mobile site.
pub struct HomePage<'a, S: Session> {
    session: &'a S,
    interact: Interactor,
}

impl<'a, S: Session> HomePage<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self::with_interactor(session, Interactor::default())
    }

    pub fn with_interactor(session: &'a S, interact: Interactor) -> Self {
        Self { session, interact }
    }

    /// Navigate to the entry URL and wait for the document to report
    /// ready, plus a short fixed settle for the initial paint.
    pub async fn open(&self) -> Result<()> {
        info!(url = ENTRY_URL, "opening home page");
        self.session.navigate(ENTRY_URL).await?;

        let deadline = Instant::now() + self.interact.timeout;
        loop {
            if self.session.document_ready().await.unwrap_or(false) {
                break;
            }
            if Instant::now() >= deadline {
                warn!("document never reported ready, continuing anyway");
                break;
            }
            tokio::time::sleep(self.interact.poll).await;
        }
        tokio::time::sleep(RENDER_SETTLE).await;
        Ok(())
    }

    /// Activate the search entry point, type `keyword`, and submit with
    /// the Enter key. Fails with [`Error::SearchUnavailable`] when no
    /// entry-point candidate resolves.
    pub async fn search_for(&self, keyword: &str) -> Result<()> {
        if let Ok(url) = self.session.current_url().await {
            debug!(%url, "url before search");
        }
        if let Ok(title) = self.session.title().await {
            debug!(%title, "page title before search");
        }

        match self.interact.click_target(self.session, &search_entry()).await {
            Ok(()) => {}
            Err(Error::TargetUnreachable { attempts, .. }) => {
                return Err(Error::SearchUnavailable(format!(
                    "no search entry locator resolved ({attempts} candidates tried)"
                )));
            }
            Err(e) => return Err(e),
        }

        info!(keyword, "submitting search");
        let field = self
            .interact
            .send_keys_target(self.session, &search_input(), keyword)
            .await?;
        self.session.press_enter(&field).await?;
        Ok(())
    }
}
