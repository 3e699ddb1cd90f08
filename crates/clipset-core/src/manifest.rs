//! Source manifest (CSV) and known-unavailable log ingestion.
//!
//! The manifest is headerless: video id, start seconds, label, split.
//! Record indices come from row position in the full manifest, before any
//! exclusion, so identity stays stable across runs and log edits.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::record::ClipRecord;

/// Delimiter in the known-unavailable log; the id is everything before it.
const UNAVAILABLE_DELIM: &str = "___";

#[derive(Debug, Deserialize)]
struct ManifestRow {
    video_id: String,
    start_secs: f64,
    label: String,
    split: String,
}

/// Reads the full manifest into records. `url_prefix` + video id forms the
/// source URL.
pub fn load_manifest(path: &Path, url_prefix: &str) -> Result<Vec<ClipRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open manifest {}", path.display()))?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<ManifestRow>().enumerate() {
        let row = row.with_context(|| format!("manifest row {}", index + 1))?;
        records.push(ClipRecord::new(
            index as u64,
            row.video_id.clone(),
            format!("{}{}", url_prefix, row.video_id),
            row.start_secs.max(0.0) as u32,
            row.label,
            row.split,
        ));
    }
    tracing::info!(rows = records.len(), "loaded manifest from {}", path.display());
    Ok(records)
}

/// Reads the known-unavailable log: one entry per line, id before `___`.
pub fn load_unavailable_ids(path: &Path) -> Result<HashSet<String>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read unavailable log {}", path.display()))?;
    let ids = data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| match l.split_once(UNAVAILABLE_DELIM) {
            Some((id, _)) => id.to_string(),
            None => l.to_string(),
        })
        .collect();
    Ok(ids)
}
