//! Wait/interaction primitives and the locator fallback strategy.
//!
//! Primitives poll the session at a fixed interval until a condition holds
//! (present, visible, clickable) or the timeout elapses. Target-level
//! operations wrap a primitive in an ordered fallback over a
//! [`Target`]'s candidate locators.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::locator::{Locator, Target};
use crate::session::Session;
use crate::{Error, Result};

/// Default bound on a single locator wait.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed polling interval inside a wait.
pub const DEFAULT_POLL: Duration = Duration::from_millis(250);

/// Bounded-wait interaction layer over a [`Session`].
#[derive(Debug, Clone, Copy)]
pub struct Interactor {
    pub timeout: Duration,
    pub poll: Duration,
}

impl Default for Interactor {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll: DEFAULT_POLL,
        }
    }
}

impl Interactor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn with_poll(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    /// Wait for the locator to be present and return its element handle.
    pub async fn find<S: Session>(&self, session: &S, locator: &Locator) -> Result<S::Element> {
        debug!(%locator, "waiting for presence");
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(probe) = session.probe(locator).await? {
                return Ok(probe.element);
            }
            if Instant::now() >= deadline {
                return Err(Error::ElementNotFound {
                    locator: locator.clone(),
                });
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    /// Wait for the locator to be clickable, then click it.
    pub async fn click<S: Session>(&self, session: &S, locator: &Locator) -> Result<()> {
        debug!(%locator, "waiting for clickable");
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(probe) = session.probe(locator).await? {
                if probe.visible && probe.interactable {
                    session.click(&probe.element).await?;
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(Error::ElementNotInteractable {
                    locator: locator.clone(),
                });
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    /// Wait for the locator to be visible, clear it, and type `text`.
    /// Returns the element so the caller can send follow-up keystrokes.
    pub async fn send_keys<S: Session>(
        &self,
        session: &S,
        locator: &Locator,
        text: &str,
    ) -> Result<S::Element> {
        debug!(%locator, "waiting for visible before typing");
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(probe) = session.probe(locator).await? {
                if probe.visible {
                    session.clear(&probe.element).await?;
                    session.type_text(&probe.element, text).await?;
                    return Ok(probe.element);
                }
            }
            if Instant::now() >= deadline {
                return Err(Error::ElementNotInteractable {
                    locator: locator.clone(),
                });
            }
            tokio::time::sleep(self.poll).await;
        }
    }

    /// Best-effort viewport scroll. Never fails; a driver error is logged
    /// and dropped.
    pub async fn scroll<S: Session>(&self, session: &S, dy: i64) {
        debug!(dy, "scrolling viewport");
        if let Err(e) = session.scroll_by(dy).await {
            debug!(error = %e, "scroll script failed");
        }
    }

    /// Resolve a target through its fallback chain and return the element.
    pub async fn find_target<S: Session>(&self, session: &S, target: &Target) -> Result<S::Element> {
        for (i, locator) in target.candidates.iter().enumerate() {
            debug!(name = target.name, candidate = i + 1, %locator, "attempting locator");
            match self.find(session, locator).await {
                Ok(element) => {
                    debug!(name = target.name, candidate = i + 1, "locator resolved");
                    return Ok(element);
                }
                Err(e) => {
                    warn!(name = target.name, candidate = i + 1, %locator, error = %e, "candidate failed, falling back");
                }
            }
        }
        Err(self.exhausted(target))
    }

    /// Resolve a target through its fallback chain and click it.
    pub async fn click_target<S: Session>(&self, session: &S, target: &Target) -> Result<()> {
        for (i, locator) in target.candidates.iter().enumerate() {
            debug!(name = target.name, candidate = i + 1, %locator, "attempting click");
            match self.click(session, locator).await {
                Ok(()) => {
                    debug!(name = target.name, candidate = i + 1, "clicked");
                    return Ok(());
                }
                Err(e) => {
                    warn!(name = target.name, candidate = i + 1, %locator, error = %e, "candidate failed, falling back");
                }
            }
        }
        Err(self.exhausted(target))
    }

    /// Resolve a target through its fallback chain, type into it, and
    /// return the element that received the text.
    pub async fn send_keys_target<S: Session>(
        &self,
        session: &S,
        target: &Target,
        text: &str,
    ) -> Result<S::Element> {
        for (i, locator) in target.candidates.iter().enumerate() {
            debug!(name = target.name, candidate = i + 1, %locator, "attempting to type");
            match self.send_keys(session, locator, text).await {
                Ok(element) => {
                    debug!(name = target.name, candidate = i + 1, "typed");
                    return Ok(element);
                }
                Err(e) => {
                    warn!(name = target.name, candidate = i + 1, %locator, error = %e, "candidate failed, falling back");
                }
            }
        }
        Err(self.exhausted(target))
    }

    fn exhausted(&self, target: &Target) -> Error {
        warn!(
            name = target.name,
            attempts = target.candidates.len(),
            "all locator candidates exhausted"
        );
        Error::TargetUnreachable {
            target: target.name,
            attempts: target.candidates.len(),
        }
    }
}
