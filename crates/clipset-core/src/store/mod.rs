//! Persistent record catalog and resumable pending-set computation.
//!
//! Precedence on startup: persisted store > filesystem probe > manifest
//! defaults. A store that exists is loaded verbatim; the filesystem
//! reconciliation pass only runs on a cold build, to recover from crashes
//! that left output files but no metadata.

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::layout::Layout;
use crate::record::{ClipRecord, RecordState};

/// Per-state record counts, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub pending: usize,
    pub downloaded_only: usize,
    pub unavailable: usize,
    pub done: usize,
}

impl StateCounts {
    pub fn total(&self) -> usize {
        self.pending + self.downloaded_only + self.unavailable + self.done
    }

    /// Records that would be submitted to the next batch.
    pub fn actionable(&self) -> usize {
        self.pending + self.downloaded_only
    }
}

/// The whole record set, owned by the driving thread between batches.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ClipRecord>,
}

impl Catalog {
    /// Builds a cold catalog: manifest records minus known-unavailable ids,
    /// then one filesystem reconciliation pass.
    pub fn build(
        manifest_records: Vec<ClipRecord>,
        excluded_ids: &HashSet<String>,
        layout: &Layout,
    ) -> Self {
        let mut records = manifest_records;
        if !excluded_ids.is_empty() {
            let before = records.len();
            records.retain(|r| !excluded_ids.contains(&r.video_id));
            tracing::info!(
                excluded = before - records.len(),
                "dropped known-unavailable ids at ingestion"
            );
        }
        let mut catalog = Self { records };
        catalog.reconcile_with_fs(layout);
        catalog
    }

    /// Loads the persisted store. `Ok(None)` when no store exists yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data =
            fs::read_to_string(path).with_context(|| format!("read store {}", path.display()))?;
        let records: Vec<ClipRecord> =
            serde_json::from_str(&data).with_context(|| format!("parse store {}", path.display()))?;
        Ok(Some(Self { records }))
    }

    /// Overwrites the store with the full record set, terminal items
    /// included. Temp file + rename so a crash never truncates the store.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create store dir {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.records).context("serialize record set")?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
        Ok(())
    }

    /// Aligns flags with what is already on disk: a final file means the
    /// record is done; a raw file alone means downloaded. Only meaningful on
    /// a cold build; a loaded store is authoritative and is never probed.
    pub fn reconcile_with_fs(&mut self, layout: &Layout) {
        let mut recovered = 0usize;
        for rec in &mut self.records {
            if layout.final_path(rec).exists() {
                rec.downloaded = true;
                rec.unavailable = false;
                rec.processed = true;
                recovered += 1;
            } else if layout.raw_path(rec).exists() {
                rec.downloaded = true;
            }
        }
        if recovered > 0 {
            tracing::info!(recovered, "reconciled completed outputs from filesystem");
        }
    }

    pub fn records(&self) -> &[ClipRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pending ∪ Downloaded-only, as `(slot, clone)` pairs for the
    /// scheduler. Slots index into this catalog for write-back.
    pub fn pending_work(&self) -> Vec<(usize, ClipRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.needs_work())
            .map(|(slot, r)| (slot, r.clone()))
            .collect()
    }

    /// Writes batch results back by slot.
    pub fn apply(&mut self, results: Vec<(usize, ClipRecord)>) {
        for (slot, rec) in results {
            debug_assert_eq!(self.records[slot].index, rec.index);
            self.records[slot] = rec;
        }
    }

    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for r in &self.records {
            match r.state() {
                RecordState::Pending => counts.pending += 1,
                RecordState::DownloadedOnly => counts.downloaded_only += 1,
                RecordState::Unavailable => counts.unavailable += 1,
                RecordState::Done => counts.done += 1,
            }
        }
        counts
    }
}
