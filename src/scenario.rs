//! The end-to-end scenario: the one ordered script gluing the page
//! abstractions together, plus session lifetime and failure handling.
//!
//! A run owns its session for its whole lifetime and releases it exactly
//! once, whatever the outcome; session ownership moves into [`run`] and
//! `close` consumes it on every exit path.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::artifacts::{self, ArtifactSet};
use crate::interact::{Interactor, DEFAULT_POLL, DEFAULT_TIMEOUT};
use crate::pages::{HomePage, StreamerPage};
use crate::session::Session;
use crate::{Error, Result};

/// Knobs for one scenario run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scenario identifier used in artifact file names.
    pub scenario_name: String,
    /// Search keyword typed into the site.
    pub keyword: String,
    /// How many viewport scrolls before selecting a card.
    pub scroll_times: usize,
    /// Pause after each scroll so lazy content can load.
    pub scroll_pause: Duration,
    /// The final URL must contain this substring.
    pub expected_domain: String,
    /// Per-locator wait bound.
    pub timeout: Duration,
    /// Polling interval inside waits.
    pub poll: Duration,
    /// Where failure artifacts are written.
    pub artifacts_dir: PathBuf,
    /// Where the flow's named screenshot is written.
    pub screenshots_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scenario_name: "twitch_wap_search".into(),
            keyword: "StarCraft II".into(),
            scroll_times: 2,
            scroll_pause: Duration::from_secs(1),
            expected_domain: "twitch.tv".into(),
            timeout: DEFAULT_TIMEOUT,
            poll: DEFAULT_POLL,
            artifacts_dir: PathBuf::from("artifacts"),
            screenshots_dir: PathBuf::from("screenshots"),
        }
    }
}

/// Outcome of one scenario run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub success: bool,
    /// The originating failure, if any.
    pub error: Option<String>,
    /// URL at the end of the flow, when it could be read.
    pub final_url: Option<String>,
    /// Failure artifacts, present only for failed runs.
    pub artifacts: Option<ArtifactSet>,
    pub duration_ms: u64,
}

/// Run the full scenario on `session`, consuming it.
///
/// Always returns a report; driver errors, assertion failures, and
/// teardown problems end up in it instead of propagating.
pub async fn run<S: Session>(session: S, opts: &RunOptions) -> RunReport {
    let start = Instant::now();

    let (success, error, final_url, artifacts) = match execute(&session, opts).await {
        Ok(url) => {
            info!(%url, "scenario passed");
            (true, None, Some(url), None)
        }
        Err(e) => {
            warn!(error = %e, "scenario failed");
            let set =
                artifacts::capture_failure(&session, &opts.artifacts_dir, &opts.scenario_name)
                    .await;
            let url = session.current_url().await.ok();
            (false, Some(e.to_string()), url, Some(set))
        }
    };

    if let Err(e) = session.close().await {
        warn!(error = %e, "session teardown failed");
    }

    RunReport {
        success,
        error,
        final_url,
        artifacts,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

async fn execute<S: Session>(session: &S, opts: &RunOptions) -> Result<String> {
    let interact = Interactor::new(opts.timeout).with_poll(opts.poll);

    let home = HomePage::with_interactor(session, interact);
    home.open().await?;
    home.search_for(&opts.keyword).await?;

    let streamer = StreamerPage::with_interactor(session, interact);
    streamer
        .scroll_and_select_first(opts.scroll_times, opts.scroll_pause)
        .await?;
    streamer
        .dismiss_gate_and_capture(&opts.screenshots_dir)
        .await?;

    let url = session.current_url().await?;
    debug!(%url, domain = %opts.expected_domain, "checking final url");
    if !url.contains(&opts.expected_domain) {
        return Err(Error::AssertionFailed(format!(
            "final url '{}' does not contain '{}'",
            url, opts.expected_domain
        )));
    }
    Ok(url)
}
