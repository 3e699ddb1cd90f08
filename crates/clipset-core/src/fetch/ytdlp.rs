//! yt-dlp acquisition backend.
//!
//! Spawns the `yt-dlp` binary and classifies its stderr: origin-side markers
//! ("video unavailable", "private video", ...) mean the content will never be
//! served and the failure is terminal; anything else is transient.

use std::path::Path;
use std::process::Command;

use super::{FetchError, Fetcher};

/// Stderr fragments that mean the origin will never serve the content.
/// Matched case-insensitively against the whole stderr output.
const UNAVAILABLE_MARKERS: &[&str] = &[
    "video unavailable",
    "private video",
    "has been removed",
    "account associated with this video has been terminated",
    "no longer available",
    "this video is not available",
];

#[derive(Debug, Clone)]
pub struct YtdlpFetcher {
    program: String,
}

impl Default for YtdlpFetcher {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
        }
    }
}

impl YtdlpFetcher {
    /// Use a different binary name/path (e.g. a pinned copy in tests).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

fn is_unavailable(stderr: &str) -> bool {
    let lower = stderr.to_lowercase();
    UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m))
}

fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("unknown error").trim()
}

impl Fetcher for YtdlpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let output = Command::new(&self.program)
            .arg("--format")
            .arg("best")
            .arg("--quiet")
            .arg("--no-progress")
            .arg("--output")
            .arg(dest)
            .arg(url)
            .output()
            // Spawn failure (binary missing, fork limits) is an environment
            // problem, not an origin-side one: leave the record pending.
            .map_err(|e| FetchError::Transient(format!("spawn {}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_unavailable(&stderr) {
            Err(FetchError::Unavailable(first_line(&stderr).to_string()))
        } else {
            tracing::debug!(%url, status = ?output.status.code(), "yt-dlp transient failure");
            Err(FetchError::Transient(first_line(&stderr).to_string()))
        }
    }
}
