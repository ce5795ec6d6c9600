//! Port doubles shared by the integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use vidprep_cli::ports::{ExecOutput, ExecutePort, ProbePort};
use vidprep_cli::probe::parse_probe_json;
use vidprep_cli::*;

/// h264/yuv420p/aac at 2 Mb/s, 300 frames: stream-copy eligible
pub const COPY_READY_PROBE: &str = r#"{
    "streams": [
        {
            "codec_type": "video",
            "codec_name": "h264",
            "pix_fmt": "yuv420p",
            "height": 720,
            "bit_rate": "2000000",
            "start_time": "0.000000",
            "has_b_frames": 0,
            "duration": "10.000000",
            "avg_frame_rate": "30/1",
            "nb_frames": "300"
        },
        {
            "codec_type": "audio",
            "codec_name": "aac"
        }
    ],
    "format": {
        "format_name": "matroska,webm",
        "duration": "10.000000"
    }
}"#;

pub fn copy_ready_media() -> ProbedMedia {
    parse_probe_json(COPY_READY_PROBE).unwrap()
}

/// Returns one fixed probe result, failing for names containing a marker
pub struct MockProbe {
    media: ProbedMedia,
    failing_marker: Option<String>,
}

impl MockProbe {
    pub fn new(media: ProbedMedia) -> Self {
        Self {
            media,
            failing_marker: None,
        }
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.failing_marker = Some(marker.to_string());
        self
    }
}

#[async_trait]
impl ProbePort for MockProbe {
    async fn probe(&self, source: &Path) -> VidprepResult<ProbedMedia> {
        let name = source.to_string_lossy();
        if let Some(marker) = &self.failing_marker {
            if name.contains(marker.as_str()) {
                return Err(VidprepError::ProbeFailure {
                    source_path: name.to_string(),
                    message: "unreadable".to_string(),
                });
            }
        }
        Ok(self.media.clone())
    }
}

/// Records invocations; single-frame extractions write their output file
#[derive(Default)]
pub struct MockExecutor {
    pub invocations: Mutex<Vec<EncodeInvocation>>,
    failing_marker: Option<String>,
    delay: Option<Duration>,
    skip_odd_frames: bool,
    running: AtomicUsize,
    pub peak_running: AtomicUsize,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.failing_marker = Some(marker.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Pretend odd frame numbers cannot be decoded
    pub fn skipping_odd_frames(mut self) -> Self {
        self.skip_odd_frames = true;
        self
    }

    pub fn recorded(&self) -> Vec<EncodeInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn frame_extractions(&self) -> Vec<EncodeInvocation> {
        self.recorded()
            .into_iter()
            .filter(|inv| inv.args.iter().any(|a| a == "-vframes"))
            .collect()
    }

    pub fn encodes(&self) -> Vec<EncodeInvocation> {
        self.recorded()
            .into_iter()
            .filter(|inv| !inv.args.iter().any(|a| a == "-vframes"))
            .collect()
    }
}

#[async_trait]
impl ExecutePort for MockExecutor {
    async fn execute(&self, invocation: &EncodeInvocation) -> VidprepResult<ExecOutput> {
        self.invocations.lock().unwrap().push(invocation.clone());

        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        let input = invocation
            .input
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(marker) = &self.failing_marker {
            if input.contains(marker.as_str()) {
                return Err(VidprepError::ExecutorFailure {
                    program: "ffmpeg".to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "Invalid data found when processing input".to_string(),
                });
            }
        }

        if invocation.args.iter().any(|a| a == "-vframes") {
            let frame: u64 = invocation
                .output
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
                .unwrap();
            if !(self.skip_odd_frames && frame % 2 == 1) {
                std::fs::write(&invocation.output, b"png").unwrap();
            }
        }
        Ok(ExecOutput::default())
    }
}
