//! The fetch-and-process operation: one record in, flag mutations out.
//!
//! Acquisition and transformation each retry up to the policy bound. Every
//! failure is contained here: nothing escapes to the scheduler, all outcomes
//! are observed through the record's flags.


use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::fetch::{FetchError, Fetcher};
use crate::layout::Layout;
use crate::record::ClipRecord;
use crate::retry::{run_with_retry, ErrorKind, RetryPolicy};
use crate::trim::Trimmer;

/// Everything one worker needs to run records. Shared read-only across the
/// pool; per-record mutable state lives in the record itself.
pub struct Worker {
    pub layout: Layout,
    pub fetcher: Arc<dyn Fetcher>,
    pub trimmer: Arc<dyn Trimmer>,
    pub policy: RetryPolicy,
    pub clip_secs: u32,
}

impl Worker {
    /// Attempts to materialize the record's final output file, mutating its
    /// flags as it goes. Never panics past its own boundary, never returns
    /// an error: completion is the only promise.
    pub fn run(&self, rec: &mut ClipRecord) {
        if let Err(e) = self.layout.ensure_dirs(rec) {
            tracing::warn!(index = rec.index, "cannot create output dirs: {}", e);
            return;
        }

        self.acquire(rec);
        if rec.downloaded && !rec.processed {
            self.transform(rec);
        }
    }

    /// Step 1: fetch raw content. Skipped when already downloaded, so a
    /// processing-only retry never touches the network again.
    fn acquire(&self, rec: &mut ClipRecord) {
        if rec.downloaded {
            return;
        }

        let raw = self.layout.raw_path(rec);
        match run_with_retry(&self.policy, FetchError::kind, || {
            self.fetcher.fetch(&rec.url, &raw)
        }) {
            Ok(()) => rec.downloaded = true,
            Err(FetchError::Unavailable(reason)) => {
                tracing::warn!(index = rec.index, video = %rec.video_id, %reason, "source unavailable");
                rec.unavailable = true;
                // Terminal failure: drop whatever partial artifacts exist.
                remove_if_present(&raw);
                remove_if_present(&self.layout.partial_path(rec));
            }
            Err(FetchError::Transient(reason)) => {
                // Record stays pending; a future run retries from scratch.
                tracing::warn!(index = rec.index, video = %rec.video_id, %reason, "fetch retries exhausted");
            }
        }
    }

    /// Step 2: trim the window out of the raw artifact and re-encode. On
    /// success the raw artifact is deleted to reclaim space; on exhausted
    /// retries it is kept so a later pass has input to work from.
    fn transform(&self, rec: &mut ClipRecord) {
        let raw = self.layout.raw_path(rec);
        let dest = self.layout.final_path(rec);
        let (start, end) = rec.window(self.clip_secs);

        match run_with_retry(
            &self.policy,
            |_| ErrorKind::Transient,
            || self.trimmer.trim(&raw, start, end, &dest),
        ) {
            Ok(()) => {
                rec.processed = true;
                if let Err(e) = fs::remove_file(&raw) {
                    tracing::warn!(index = rec.index, "cannot remove raw artifact: {}", e);
                }
            }
            Err(e) => {
                tracing::warn!(index = rec.index, video = %rec.video_id, "trim retries exhausted: {}", e);
            }
        }
    }
}

fn remove_if_present(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("cannot remove {}: {}", path.display(), e),
    }
}
