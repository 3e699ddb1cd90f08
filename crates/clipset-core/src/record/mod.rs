//! Clip record: the persisted unit of work.
//!
//! One record describes a single source clip (URL, time window, label, split)
//! plus the three mutable status flags the pipeline drives. Records are the
//! only thing workers mutate; everything else observes them.

mod sanitize;

pub use sanitize::sanitize_label;

use serde::{Deserialize, Serialize};

/// One unit of work: a source clip and its processing status.
///
/// Serialized field names are the on-disk store contract; renaming them
/// breaks rehydration of existing stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRecord {
    /// Stable sequence index, assigned from manifest row position. Identity
    /// across runs: rehydration matches records by this, never recreates.
    pub index: u64,
    /// Source video identifier.
    pub video_id: String,
    /// Full source URL.
    pub url: String,
    /// Clip window start, in seconds from the start of the source.
    pub start_secs: u32,
    /// Classification label; also feeds output file names.
    pub label: String,
    /// Dataset split (e.g. "train" / "test"); routes output directories.
    pub split: String,

    /// Raw source content has been fetched to the raw path.
    #[serde(default)]
    pub downloaded: bool,
    /// The origin will never serve this content. Sticky: once set, the
    /// record is permanently excluded from resubmission.
    #[serde(default)]
    pub unavailable: bool,
    /// Final trimmed clip has been written to the final path.
    #[serde(default)]
    pub processed: bool,
}

/// Lifecycle classification of a record, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Not downloaded, not processed, not unavailable: eligible for a full pass.
    Pending,
    /// Downloaded but not processed: eligible for a processing-only pass.
    DownloadedOnly,
    /// Terminal: origin-side failure, never resubmitted.
    Unavailable,
    /// Terminal: downloaded and processed.
    Done,
}

impl RecordState {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordState::Pending => "pending",
            RecordState::DownloadedOnly => "downloaded-only",
            RecordState::Unavailable => "unavailable",
            RecordState::Done => "done",
        }
    }
}

impl ClipRecord {
    pub fn new(
        index: u64,
        video_id: impl Into<String>,
        url: impl Into<String>,
        start_secs: u32,
        label: impl Into<String>,
        split: impl Into<String>,
    ) -> Self {
        Self {
            index,
            video_id: video_id.into(),
            url: url.into(),
            start_secs,
            label: label.into(),
            split: split.into(),
            downloaded: false,
            unavailable: false,
            processed: false,
        }
    }

    /// Clip window `[start, end)` for a configured clip duration.
    pub fn window(&self, clip_secs: u32) -> (u32, u32) {
        (self.start_secs, self.start_secs + clip_secs)
    }

    /// Raw-download file name, a deterministic function of label + index.
    pub fn raw_file_name(&self) -> String {
        format!("{}_{}.mp4", sanitize_label(&self.label), self.index)
    }

    /// Final trimmed file name. Same derivation as the raw name; the two
    /// live under different roots.
    pub fn final_file_name(&self) -> String {
        format!("{}_{}.mp4", sanitize_label(&self.label), self.index)
    }

    pub fn state(&self) -> RecordState {
        if self.unavailable {
            RecordState::Unavailable
        } else if self.processed {
            RecordState::Done
        } else if self.downloaded {
            RecordState::DownloadedOnly
        } else {
            RecordState::Pending
        }
    }

    /// Whether the record should be submitted to the pipeline again.
    pub fn needs_work(&self) -> bool {
        matches!(
            self.state(),
            RecordState::Pending | RecordState::DownloadedOnly
        )
    }
}
