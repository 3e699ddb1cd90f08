//! Transformation: extract the clip window from raw content and re-encode
//! it to the final output format.

mod ffmpeg;

pub use ffmpeg::FfmpegTrimmer;

use std::path::Path;

/// Error from one transformation attempt. Always treated as transient by the
/// retry policy: the raw artifact is still on disk, so a later pass can try
/// again.
#[derive(Debug, thiserror::Error)]
pub enum TrimError {
    #[error("spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Transformation backend: trims `[start_secs, end_secs)` out of `raw` and
/// writes the re-encoded result to `dest`.
///
/// Implementations must be safe to call concurrently for distinct paths.
pub trait Trimmer: Send + Sync {
    fn trim(&self, raw: &Path, start_secs: u32, end_secs: u32, dest: &Path)
        -> Result<(), TrimError>;
}
