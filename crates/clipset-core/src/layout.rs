//! On-disk layout: two roots (raw downloads, final clips), each subdivided
//! by split, with per-record file names derived from label + index.
//!
//! Every record owns exactly one raw path and one final path; no two records
//! share a path, so workers never contend on the same file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::record::ClipRecord;

/// Suffix some downloaders append to in-flight files.
pub const PARTIAL_SUFFIX: &str = ".part";

#[derive(Debug, Clone)]
pub struct Layout {
    raw_root: PathBuf,
    final_root: PathBuf,
}

impl Layout {
    pub fn new(raw_root: impl Into<PathBuf>, final_root: impl Into<PathBuf>) -> Self {
        Self {
            raw_root: raw_root.into(),
            final_root: final_root.into(),
        }
    }

    pub fn raw_root(&self) -> &Path {
        &self.raw_root
    }

    pub fn final_root(&self) -> &Path {
        &self.final_root
    }

    /// Where the raw download for this record lives.
    pub fn raw_path(&self, rec: &ClipRecord) -> PathBuf {
        self.raw_root.join(&rec.split).join(rec.raw_file_name())
    }

    /// Where the trimmed final clip for this record lives.
    pub fn final_path(&self, rec: &ClipRecord) -> PathBuf {
        self.final_root.join(&rec.split).join(rec.final_file_name())
    }

    /// In-flight partial next to the raw path (`<raw>.part`).
    pub fn partial_path(&self, rec: &ClipRecord) -> PathBuf {
        let mut p = self.raw_path(rec).into_os_string();
        p.push(PARTIAL_SUFFIX);
        PathBuf::from(p)
    }

    /// Creates the split subdirectories this record writes under.
    pub fn ensure_dirs(&self, rec: &ClipRecord) -> io::Result<()> {
        fs::create_dir_all(self.raw_root.join(&rec.split))?;
        fs::create_dir_all(self.final_root.join(&rec.split))?;
        Ok(())
    }
}
