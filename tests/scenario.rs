//! Harness tests against a scripted fake session.
//!
//! These cover the fallback strategy, artifact capture, session lifetime,
//! and the full end-to-end flow without needing a browser.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use wapcheck::artifacts;
use wapcheck::pages::{StreamerPage, ENTRY_URL, SCREENSHOT_NAME};
use wapcheck::scenario::{self, RunOptions};
use wapcheck::{Error, Interactor, Locator, Probe, Session, SessionError, Target};

/// Shared, inspectable state behind a [`FakeSession`]. The test keeps its
/// own `Arc` so it can still assert after `close` consumed the session.
#[derive(Default)]
struct FakeState {
    /// A selector containing any of these markers counts as present,
    /// visible, and interactable.
    present: Mutex<Vec<String>>,
    probes: Mutex<Vec<String>>,
    clicks: Mutex<Vec<String>>,
    typed: Mutex<Vec<(String, String)>>,
    submits: Mutex<Vec<String>>,
    scrolls: Mutex<Vec<i64>>,
    navigations: Mutex<Vec<String>>,
    url: Mutex<String>,
    teardowns: AtomicUsize,
    /// Every driver call fails, as if the session were already torn down.
    broken: bool,
}

impl FakeState {
    fn mark_present(&self, marker: &str) {
        self.present.lock().unwrap().push(marker.to_string());
    }

    fn is_present(&self, selector: &str) -> bool {
        self.present
            .lock()
            .unwrap()
            .iter()
            .any(|marker| selector.contains(marker.as_str()))
    }
}

struct FakeSession {
    state: Arc<FakeState>,
}

impl FakeSession {
    fn new() -> (Self, Arc<FakeState>) {
        let state = Arc::new(FakeState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    fn broken() -> (Self, Arc<FakeState>) {
        let state = Arc::new(FakeState {
            broken: true,
            ..FakeState::default()
        });
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    fn gone(&self) -> Result<(), SessionError> {
        if self.state.broken {
            Err(SessionError("invalid session id".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Session for FakeSession {
    type Element = String;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.gone()?;
        self.state.navigations.lock().unwrap().push(url.to_string());
        *self.state.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn probe(&self, locator: &Locator) -> Result<Option<Probe<String>>, SessionError> {
        self.gone()?;
        self.state
            .probes
            .lock()
            .unwrap()
            .push(locator.selector.clone());
        if self.state.is_present(&locator.selector) {
            Ok(Some(Probe {
                element: locator.selector.clone(),
                visible: true,
                interactable: true,
            }))
        } else {
            Ok(None)
        }
    }

    async fn click(&self, element: &String) -> Result<(), SessionError> {
        self.gone()?;
        self.state.clicks.lock().unwrap().push(element.clone());
        if element.contains("page-main-content-wrapper") {
            *self.state.url.lock().unwrap() = "https://m.twitch.tv/beastyqt".to_string();
        }
        Ok(())
    }

    async fn clear(&self, _element: &String) -> Result<(), SessionError> {
        self.gone()
    }

    async fn type_text(&self, element: &String, text: &str) -> Result<(), SessionError> {
        self.gone()?;
        self.state
            .typed
            .lock()
            .unwrap()
            .push((element.clone(), text.to_string()));
        Ok(())
    }

    async fn press_enter(&self, element: &String) -> Result<(), SessionError> {
        self.gone()?;
        self.state.submits.lock().unwrap().push(element.clone());
        *self.state.url.lock().unwrap() =
            "https://m.twitch.tv/search?term=StarCraft%20II".to_string();
        Ok(())
    }

    async fn scroll_by(&self, dy: i64) -> Result<(), SessionError> {
        self.gone()?;
        self.state.scrolls.lock().unwrap().push(dy);
        Ok(())
    }

    async fn document_ready(&self) -> Result<bool, SessionError> {
        self.gone()?;
        Ok(true)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        self.gone()?;
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        self.gone()?;
        Ok("<html><body>fake</body></html>".to_string())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        self.gone()?;
        Ok(self.state.url.lock().unwrap().clone())
    }

    async fn title(&self) -> Result<String, SessionError> {
        self.gone()?;
        Ok("Twitch".to_string())
    }

    async fn close(self) -> Result<(), SessionError> {
        self.state.teardowns.fetch_add(1, Ordering::SeqCst);
        self.gone()
    }
}

/// Interactor with waits short enough for scripted outcomes: absent
/// elements fail after a single probe.
fn fast_interactor() -> Interactor {
    Interactor::new(Duration::ZERO).with_poll(Duration::from_millis(1))
}

fn fast_options(artifacts_dir: &Path, screenshots_dir: &Path) -> RunOptions {
    RunOptions {
        timeout: Duration::from_millis(50),
        poll: Duration::from_millis(5),
        scroll_pause: Duration::from_millis(10),
        artifacts_dir: artifacts_dir.to_path_buf(),
        screenshots_dir: screenshots_dir.to_path_buf(),
        ..RunOptions::default()
    }
}

#[tokio::test]
async fn test_fallback_uses_first_successful_candidate() {
    let (session, state) = FakeSession::new();
    state.mark_present("cand-c");

    let target = Target::new(
        "probe target",
        vec![
            Locator::css("#cand-a"),
            Locator::css("#cand-b"),
            Locator::css("#cand-c"),
        ],
    );

    let element = fast_interactor()
        .find_target(&session, &target)
        .await
        .expect("third candidate should resolve");
    assert_eq!(element, "#cand-c");

    let probes = state.probes.lock().unwrap();
    assert_eq!(*probes, vec!["#cand-a", "#cand-b", "#cand-c"]);
}

#[tokio::test]
async fn test_fallback_exhaustion_reports_target_unreachable() {
    let (session, state) = FakeSession::new();

    let target = Target::new(
        "gate",
        vec![
            Locator::css("#cand-a"),
            Locator::css("#cand-b"),
            Locator::xpath("//button[@id='cand-c']"),
        ],
    );

    let err = fast_interactor()
        .click_target(&session, &target)
        .await
        .expect_err("no candidate should resolve");
    match err {
        Error::TargetUnreachable { target, attempts } => {
            assert_eq!(target, "gate");
            assert_eq!(attempts, 3);
        }
        other => panic!("expected TargetUnreachable, got: {other}"),
    }

    // Exactly one attempt per candidate: no early abort, no extra retries.
    assert_eq!(state.probes.lock().unwrap().len(), 3);
    assert!(state.clicks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_artifact_capture_writes_all_three() {
    let (session, _state) = FakeSession::new();
    let dir = tempfile::tempdir().unwrap();

    let set = artifacts::capture_failure(&session, dir.path(), "fallback_check").await;

    assert!(set.id.starts_with("fallback_check_"));
    for outcome in [&set.screenshot, &set.markup, &set.metadata] {
        let path = outcome.path().expect("sub-capture should be written");
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with(&set.id));
    }

    let meta = std::fs::read_to_string(set.metadata.path().unwrap()).unwrap();
    assert!(meta.contains("current_url: "));
    assert!(meta.contains("title: Twitch"));
}

#[tokio::test]
async fn test_artifact_capture_survives_broken_session() {
    let (session, _state) = FakeSession::broken();
    let dir = tempfile::tempdir().unwrap();

    // Must not panic or propagate anything.
    let set = artifacts::capture_failure(&session, dir.path(), "broken_session").await;

    assert!(!set.screenshot.is_written());
    assert!(!set.markup.is_written());
    // Metadata degrades to placeholder values but is still written.
    let meta = std::fs::read_to_string(set.metadata.path().unwrap()).unwrap();
    assert!(meta.contains("current_url: <unavailable:"));
    assert!(meta.contains("title: <unavailable:"));
}

#[tokio::test]
async fn test_session_released_once_on_success() {
    let (session, state) = FakeSession::new();
    state.mark_present(r#"aria-label="Search""#);
    state.mark_present(r#"input[type="search"]"#);
    state.mark_present("page-main-content-wrapper");

    let artifacts_dir = tempfile::tempdir().unwrap();
    let screenshots_dir = tempfile::tempdir().unwrap();
    let report = scenario::run(
        session,
        &fast_options(artifacts_dir.path(), screenshots_dir.path()),
    )
    .await;

    assert!(report.success, "run failed: {:?}", report.error);
    assert_eq!(state.teardowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_released_once_on_failure() {
    // Nothing present: the search entry point is unreachable and the run
    // fails, but the session is still torn down exactly once.
    let (session, state) = FakeSession::new();

    let artifacts_dir = tempfile::tempdir().unwrap();
    let screenshots_dir = tempfile::tempdir().unwrap();
    let report = scenario::run(
        session,
        &fast_options(artifacts_dir.path(), screenshots_dir.path()),
    )
    .await;

    assert!(!report.success);
    assert!(report.error.unwrap().contains("search unavailable"));
    assert_eq!(state.teardowns.load(Ordering::SeqCst), 1);

    let set = report.artifacts.expect("failed run should carry artifacts");
    assert!(set.screenshot.is_written());
    assert!(set.markup.is_written());
    assert!(set.metadata.is_written());
}

#[tokio::test]
async fn test_gate_absence_is_not_fatal() {
    // Neither the gate nor the video player exists; the screenshot still
    // gets taken and the step succeeds.
    let (session, state) = FakeSession::new();
    let dir = tempfile::tempdir().unwrap();

    let page = StreamerPage::with_interactor(&session, fast_interactor());
    page.dismiss_gate_and_capture(dir.path())
        .await
        .expect("gate absence must not fail the step");

    assert!(state.clicks.lock().unwrap().is_empty());
    assert!(dir.path().join(format!("{SCREENSHOT_NAME}.png")).exists());
}

#[tokio::test]
async fn test_end_to_end_search_flow() {
    let (session, state) = FakeSession::new();
    // Search entry resolves via its second candidate, the input and the
    // first card via their primary ones. No gate, no video.
    state.mark_present(r#"aria-label="Search""#);
    state.mark_present(r#"input[type="search"]"#);
    state.mark_present("page-main-content-wrapper");

    let artifacts_dir = tempfile::tempdir().unwrap();
    let screenshots_dir = tempfile::tempdir().unwrap();
    let report = scenario::run(
        session,
        &fast_options(artifacts_dir.path(), screenshots_dir.path()),
    )
    .await;

    assert!(report.success, "run failed: {:?}", report.error);
    assert!(report.error.is_none());
    assert!(report.artifacts.is_none());
    assert!(report.final_url.unwrap().contains("twitch.tv"));

    assert_eq!(*state.navigations.lock().unwrap(), vec![ENTRY_URL]);

    // Entry point was clicked through the aria-label fallback, after the
    // primary directory-link candidate was probed and missed.
    let probes = state.probes.lock().unwrap();
    assert!(probes.iter().any(|s| s.contains("/directory")));
    let clicks = state.clicks.lock().unwrap();
    assert!(clicks.iter().any(|s| s.contains(r#"aria-label="Search""#)));
    assert!(clicks.iter().any(|s| s.contains("page-main-content-wrapper")));
    // The gate confirm button was never found, so never clicked.
    assert!(!clicks.iter().any(|s| s.contains("content-classification")));

    let typed = state.typed.lock().unwrap();
    assert_eq!(typed.len(), 1);
    assert!(typed[0].0.contains(r#"input[type="search"]"#));
    assert_eq!(typed[0].1, "StarCraft II");
    assert_eq!(state.submits.lock().unwrap().len(), 1);

    assert_eq!(*state.scrolls.lock().unwrap(), vec![500, 500]);

    assert!(screenshots_dir
        .path()
        .join(format!("{SCREENSHOT_NAME}.png"))
        .exists());
}
