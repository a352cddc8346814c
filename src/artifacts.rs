//! Failure-artifact capture.
//!
//! On a failing run this writes a screenshot, a markup snapshot, and a
//! small metadata file, all keyed by `{scenario}_{timestamp}`. Each of the
//! three sub-captures is isolated and best-effort: one failing (for
//! example because the session is already gone) never stops the others,
//! and nothing here ever propagates an error that could mask the original
//! test failure.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::session::Session;

/// Outcome of one best-effort sub-capture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOutcome {
    Written(PathBuf),
    Failed(String),
}

impl CaptureOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, CaptureOutcome::Written(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            CaptureOutcome::Written(path) => Some(path),
            CaptureOutcome::Failed(_) => None,
        }
    }
}

/// The three diagnostic files of one failing run.
#[derive(Debug, Serialize)]
pub struct ArtifactSet {
    /// Shared identifier: scenario name plus timestamp.
    pub id: String,
    pub screenshot: CaptureOutcome,
    pub markup: CaptureOutcome,
    pub metadata: CaptureOutcome,
}

/// Save a viewport screenshot as `{name}.png` under `dir`. Used both for
/// the scenario's success-path screenshot and for failure capture.
pub async fn save_screenshot<S: Session>(session: &S, dir: &Path, name: &str) -> CaptureOutcome {
    if let Err(e) = fs::create_dir_all(dir) {
        return CaptureOutcome::Failed(format!("create {}: {e}", dir.display()));
    }
    let path = dir.join(format!("{name}.png"));
    match session.screenshot().await {
        Ok(bytes) => match fs::write(&path, bytes) {
            Ok(()) => CaptureOutcome::Written(path),
            Err(e) => CaptureOutcome::Failed(format!("write {}: {e}", path.display())),
        },
        Err(e) => CaptureOutcome::Failed(format!("screenshot: {e}")),
    }
}

/// Capture all three failure artifacts for `scenario`. Never fails.
pub async fn capture_failure<S: Session>(session: &S, dir: &Path, scenario: &str) -> ArtifactSet {
    let id = format!("{scenario}_{}", Local::now().format("%Y%m%d_%H%M%S"));
    info!(%id, dir = %dir.display(), "capturing failure artifacts");

    let screenshot = save_screenshot(session, dir, &id).await;
    let markup = capture_markup(session, dir, &id).await;
    let metadata = capture_metadata(session, dir, &id).await;

    for (kind, outcome) in [
        ("screenshot", &screenshot),
        ("markup", &markup),
        ("metadata", &metadata),
    ] {
        match outcome {
            CaptureOutcome::Written(path) => debug!(kind, path = %path.display(), "artifact written"),
            CaptureOutcome::Failed(reason) => warn!(kind, %reason, "artifact capture failed"),
        }
    }

    ArtifactSet {
        id,
        screenshot,
        markup,
        metadata,
    }
}

async fn capture_markup<S: Session>(session: &S, dir: &Path, id: &str) -> CaptureOutcome {
    if let Err(e) = fs::create_dir_all(dir) {
        return CaptureOutcome::Failed(format!("create {}: {e}", dir.display()));
    }
    let path = dir.join(format!("{id}.html"));
    match session.page_source().await {
        Ok(html) => match fs::write(&path, html) {
            Ok(()) => CaptureOutcome::Written(path),
            Err(e) => CaptureOutcome::Failed(format!("write {}: {e}", path.display())),
        },
        Err(e) => CaptureOutcome::Failed(format!("page source: {e}")),
    }
}

async fn capture_metadata<S: Session>(session: &S, dir: &Path, id: &str) -> CaptureOutcome {
    if let Err(e) = fs::create_dir_all(dir) {
        return CaptureOutcome::Failed(format!("create {}: {e}", dir.display()));
    }
    let path = dir.join(format!("{id}.txt"));

    let url = session
        .current_url()
        .await
        .unwrap_or_else(|e| format!("<unavailable: {e}>"));
    let title = session
        .title()
        .await
        .unwrap_or_else(|e| format!("<unavailable: {e}>"));

    let body = format!("current_url: {url}\ntitle: {title}\n");
    match fs::write(&path, body) {
        Ok(()) => CaptureOutcome::Written(path),
        Err(e) => CaptureOutcome::Failed(format!("write {}: {e}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_outcome_accessors() {
        let written = CaptureOutcome::Written(PathBuf::from("artifacts/run_1.png"));
        assert!(written.is_written());
        assert_eq!(written.path(), Some(Path::new("artifacts/run_1.png")));

        let failed = CaptureOutcome::Failed("session gone".into());
        assert!(!failed.is_written());
        assert_eq!(failed.path(), None);
    }
}
