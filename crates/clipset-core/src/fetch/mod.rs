//! Acquisition: retrieve raw source content to local storage.
//!
//! The error type is the contract with the caller: a failed attempt is either
//! `Transient` (worth retrying) or `Unavailable` (the origin will never serve
//! this content; terminal for the record). Classification happens inside the
//! backend so callers never inspect error strings.

mod http;
mod ytdlp;

pub use http::HttpFetcher;
pub use ytdlp::YtdlpFetcher;

use std::path::Path;

use crate::retry::ErrorKind;

/// Error from one acquisition attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Local or network hiccup; a later attempt may succeed.
    #[error("transient fetch failure: {0}")]
    Transient(String),
    /// The origin will never serve this content (removed, private, gone).
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transient(_) => ErrorKind::Transient,
            FetchError::Unavailable(_) => ErrorKind::Fatal,
        }
    }
}

/// Acquisition backend: retrieves one source URL to a local file.
///
/// Implementations must be safe to call concurrently for distinct
/// destination paths; the scheduler never runs two calls for the same path.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}
