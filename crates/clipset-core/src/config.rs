use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per step (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.5 = 500ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Acquisition backend: yt-dlp subprocess (default) or direct HTTP GET for
/// plain media URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchBackend {
    #[default]
    Ytdlp,
    Http,
}

/// Global configuration loaded from `~/.config/clipset/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipsetConfig {
    /// Worker pool width for a batch.
    pub max_workers: usize,
    /// Clip window length in seconds; end offset = start + this.
    pub clip_secs: u32,
    /// Root directory for raw downloads, subdivided by split.
    pub raw_root: PathBuf,
    /// Root directory for final trimmed clips, subdivided by split.
    pub final_root: PathBuf,
    /// Durable record store (JSON), read at startup and overwritten at the
    /// end of a run.
    pub store_path: PathBuf,
    /// Prefix prepended to a manifest video id to form the source URL.
    pub url_prefix: String,
    /// Optional known-unavailable log consulted at cold ingestion.
    #[serde(default)]
    pub unavailable_log: Option<PathBuf>,
    /// Acquisition backend: "ytdlp" (default) or "http".
    #[serde(default)]
    pub fetch_backend: Option<FetchBackend>,
    /// Optional retry policy; if missing, built-in defaults are used.
    /// Kept last so the TOML table serializes after all scalar keys.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for ClipsetConfig {
    fn default() -> Self {
        Self {
            max_workers: 50,
            clip_secs: 10,
            raw_root: PathBuf::from("clipset_raw"),
            final_root: PathBuf::from("clipset_clips"),
            store_path: PathBuf::from("metadata/clipset_records.json"),
            url_prefix: "https://www.youtube.com/watch?v=".to_string(),
            unavailable_log: None,
            fetch_backend: None,
            retry: None,
        }
    }
}

impl ClipsetConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryConfig::to_policy)
            .unwrap_or_else(|| RetryConfig::default().to_policy())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("clipset")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ClipsetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ClipsetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ClipsetConfig = toml::from_str(&data)?;
    Ok(cfg)
}
