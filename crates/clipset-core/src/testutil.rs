//! Trait fakes shared by pipeline and scheduler tests.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::fetch::{FetchError, Fetcher};
use crate::retry::RetryPolicy;
use crate::trim::{TrimError, Trimmer};

/// Retry policy with no sleeps, for tests.
pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

/// Fetcher backed by a closure.
pub struct FnFetcher<F>(pub F);

impl<F> Fetcher for FnFetcher<F>
where
    F: Fn(&str, &Path) -> Result<(), FetchError> + Send + Sync,
{
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        (self.0)(url, dest)
    }
}

/// Trimmer backed by a closure.
pub struct FnTrimmer<F>(pub F);

impl<F> Trimmer for FnTrimmer<F>
where
    F: Fn(&Path, u32, u32, &Path) -> Result<(), TrimError> + Send + Sync,
{
    fn trim(
        &self,
        raw: &Path,
        start_secs: u32,
        end_secs: u32,
        dest: &Path,
    ) -> Result<(), TrimError> {
        (self.0)(raw, start_secs, end_secs, dest)
    }
}

/// Trimmer that copies the raw file to the destination.
pub struct CopyTrimmer;

impl Trimmer for CopyTrimmer {
    fn trim(&self, raw: &Path, _start: u32, _end: u32, dest: &Path) -> Result<(), TrimError> {
        fs::copy(raw, dest)
            .map(|_| ())
            .map_err(|e| TrimError::Encode(e.to_string()))
    }
}
