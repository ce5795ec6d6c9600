//! FFprobe adapter for media file probing
//!
//! Shells out to `ffprobe -loglevel 0 -print_format json -show_format
//! -show_streams` and hands the JSON to the probe parser.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::adapters::command::run_tool;
use crate::domain::model::ProbedMedia;
use crate::error::{VidprepError, VidprepResult};
use crate::ports::ProbePort;
use crate::probe::parse_probe_json;

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FfprobeAdapter {
    ffprobe_path: PathBuf,
    timeout: Duration,
}

impl FfprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(ffprobe_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }

    fn probe_args(source: &Path) -> Vec<String> {
        vec![
            "-loglevel".to_string(),
            "0".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_format".to_string(),
            "-show_streams".to_string(),
            source.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe(&self, source: &Path) -> VidprepResult<ProbedMedia> {
        info!("Probing {}", source.display());
        let failure = |message: String| VidprepError::ProbeFailure {
            source_path: source.display().to_string(),
            message,
        };

        let output = run_tool(&self.ffprobe_path, &Self::probe_args(source), self.timeout)
            .await
            .map_err(|e| failure(e.to_string()))?;
        if !output.status.success() {
            return Err(failure(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_probe_json(&stdout) {
            Err(VidprepError::JsonError(e)) => Err(failure(format!("unreadable probe output: {}", e))),
            other => other,
        }
    }
}
