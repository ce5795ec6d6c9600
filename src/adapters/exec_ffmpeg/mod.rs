//! FFmpeg execution adapter
//!
//! Runs `ffmpeg [-i <input>] <args...> <output>` with the argument list
//! passed through untouched, one token per argument.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::adapters::command::{program_name, run_tool};
use crate::domain::model::EncodeInvocation;
use crate::error::{VidprepError, VidprepResult};
use crate::ports::{ExecOutput, ExecutePort};

/// Longest stderr tail kept in a failure report
const STDERR_TAIL: usize = 2000;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FfmpegAdapter {
    ffmpeg_path: PathBuf,
    timeout: Duration,
}

impl FfmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(ffmpeg_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ExecutePort for FfmpegAdapter {
    async fn execute(&self, invocation: &EncodeInvocation) -> VidprepResult<ExecOutput> {
        let line = invocation.command_line();
        info!(
            "{} {}",
            self.ffmpeg_path.display(),
            line.join(" ")
        );

        let output = run_tool(&self.ffmpeg_path, &line, self.timeout).await?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(VidprepError::ExecutorFailure {
                program: program_name(&self.ffmpeg_path),
                status: output.status.to_string(),
                stderr: tail(&stderr, STDERR_TAIL).trim().to_string(),
            });
        }

        debug!(output = %invocation.output.display(), "Encoder finished");
        Ok(ExecOutput { stdout, stderr })
    }
}

/// Last `max` bytes of `text`, cut on a char boundary
fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("abc", 10), "abc");
        assert_eq!(tail("aé", 1), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_executor_failure() {
        // `false` ignores its arguments and exits 1
        let adapter = FfmpegAdapter::new("false", Duration::from_secs(5));
        let invocation = EncodeInvocation::new("in.mp4", vec!["-c:v".into(), "copy".into()], "out.mp4");
        let err = adapter.execute(&invocation).await.unwrap_err();
        assert!(matches!(err, VidprepError::ExecutorFailure { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit_is_success() {
        let adapter = FfmpegAdapter::new("true", Duration::from_secs(5));
        let invocation = EncodeInvocation::new("in.mp4", Vec::new(), "out.mp4");
        assert!(adapter.execute(&invocation).await.is_ok());
    }
}
