//! Per-interval clip extraction planning

use std::path::Path;

use crate::domain::model::{ClipInterval, EncodeInvocation};
use crate::error::VidprepResult;
use crate::utils::path::PathUtils;

/// Encoder used for accurate (non-fast) clips
const CLIP_ENCODER: &str = "libx264";

/// Builds one encoder invocation per clip interval
#[derive(Debug, Clone, Copy)]
pub struct ClipPlanner {
    /// Stream-copy instead of re-encoding; faster but short clips may start
    /// with artifacts
    fast: bool,
}

impl ClipPlanner {
    pub fn new(fast: bool) -> Self {
        Self { fast }
    }

    pub fn args(&self, interval: &ClipInterval) -> Vec<String> {
        let mut args = vec![
            "-ss".to_string(),
            interval.start.to_string(),
            "-to".to_string(),
            interval.end.to_string(),
        ];
        if self.fast {
            args.extend(["-c".to_string(), "copy".to_string()]);
        } else {
            args.extend(["-codec:v".to_string(), CLIP_ENCODER.to_string()]);
        }
        args.push("-y".to_string());
        args
    }

    /// `<output_dir>/<video stem>/<start>-<end>.mp4`
    pub fn plan(
        &self,
        video: &Path,
        output_dir: &Path,
        interval: &ClipInterval,
    ) -> VidprepResult<EncodeInvocation> {
        let destination = output_dir
            .join(PathUtils::stem(video)?)
            .join(format!("{}-{}.mp4", interval.start, interval.end));
        Ok(EncodeInvocation::new(video, self.args(interval), destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Timestamp;
    use std::path::PathBuf;

    fn interval() -> ClipInterval {
        ClipInterval {
            start: Timestamp::parse("00:00:10").unwrap(),
            end: Timestamp::parse("00:00:20").unwrap(),
        }
    }

    #[test]
    fn test_accurate_clip_args() {
        assert_eq!(
            ClipPlanner::new(false).args(&interval()),
            vec!["-ss", "00:00:10", "-to", "00:00:20", "-codec:v", "libx264", "-y"]
        );
    }

    #[test]
    fn test_fast_clip_args() {
        assert_eq!(
            ClipPlanner::new(true).args(&interval()),
            vec!["-ss", "00:00:10", "-to", "00:00:20", "-c", "copy", "-y"]
        );
    }

    #[test]
    fn test_clip_destination() {
        let invocation = ClipPlanner::new(false)
            .plan(Path::new("/videos/final.mp4"), Path::new("/clips"), &interval())
            .unwrap();
        assert_eq!(
            invocation.output,
            PathBuf::from("/clips/final/00:00:10-00:00:20.mp4")
        );
        assert_eq!(invocation.input, Some(PathBuf::from("/videos/final.mp4")));
    }
}
