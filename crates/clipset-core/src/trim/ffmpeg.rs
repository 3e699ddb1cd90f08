//! ffmpeg transformation backend: trim + H.264/AAC re-encode.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use super::{TrimError, Trimmer};

#[derive(Debug, Clone)]
pub struct FfmpegTrimmer {
    program: String,
}

impl Default for FfmpegTrimmer {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegTrimmer {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Input seeking (`-ss` before `-i`) so ffmpeg does not decode the whole
/// source; `-t` bounds the output to the window length.
fn build_args(raw: &Path, start_secs: u32, end_secs: u32, dest: &Path) -> Vec<OsString> {
    let duration = end_secs.saturating_sub(start_secs);
    vec![
        OsString::from("-y"),
        OsString::from("-loglevel"),
        OsString::from("error"),
        OsString::from("-ss"),
        OsString::from(start_secs.to_string()),
        OsString::from("-i"),
        raw.as_os_str().to_os_string(),
        OsString::from("-t"),
        OsString::from(duration.to_string()),
        OsString::from("-c:v"),
        OsString::from("libx264"),
        OsString::from("-c:a"),
        OsString::from("aac"),
        dest.as_os_str().to_os_string(),
    ]
}

impl Trimmer for FfmpegTrimmer {
    fn trim(
        &self,
        raw: &Path,
        start_secs: u32,
        end_secs: u32,
        dest: &Path,
    ) -> Result<(), TrimError> {
        let output = Command::new(&self.program)
            .args(build_args(raw, start_secs, end_secs, dest))
            .output()
            .map_err(|e| TrimError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(TrimError::Encode(
                stderr.lines().last().unwrap_or("unknown ffmpeg error").to_string(),
            ))
        }
    }
}
