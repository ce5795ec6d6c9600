//! Frame grab planning: dump a window of a video as numbered JPEG files

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::model::{EncodeInvocation, StreamDescriptor, Timestamp, VideoFilter};
use crate::error::{VidprepError, VidprepResult};
use crate::planner::fps::OutputFpsCalculator;

/// JPEG quality accepted by the encoder's `-qscale:v`
pub const QUALITY_RANGE: std::ops::RangeInclusive<u8> = 1..=31;
/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 2;
/// Name pattern of grabbed frames inside the output folder
pub const FRAME_PATTERN: &str = "%06d.jpeg";
/// Log file recording the encoder command line
pub const GRAB_LOG_FILE: &str = "grab_log.txt";

/// Validated grab options
#[derive(Debug, Clone, PartialEq)]
pub struct GrabRequest {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub frame_count: Option<u32>,
    pub fps: Option<u32>,
    pub resolution: Option<String>,
    pub quality: u8,
    /// Record the encoder command line in `grab_log.txt`
    pub write_log: bool,
}

impl GrabRequest {
    pub fn new(
        start: Option<Timestamp>,
        end: Option<Timestamp>,
        frame_count: Option<u32>,
        fps: Option<u32>,
        resolution: Option<String>,
        quality: u8,
    ) -> VidprepResult<Self> {
        if frame_count.is_some() && fps.is_some() {
            return Err(VidprepError::InvalidArgument(
                "fps can only be set when no frame count is requested".to_string(),
            ));
        }
        if !QUALITY_RANGE.contains(&quality) {
            return Err(VidprepError::InvalidArgument(format!(
                "quality must be in the range {}-{}, got {}",
                QUALITY_RANGE.start(),
                QUALITY_RANGE.end(),
                quality
            )));
        }
        if frame_count == Some(0) || fps == Some(0) {
            return Err(VidprepError::InvalidArgument(
                "frame count and fps must be positive".to_string(),
            ));
        }
        if let Some(resolution) = &resolution {
            validate_resolution(resolution)?;
        }
        let start = start.unwrap_or_else(Timestamp::zero);
        if let Some(end) = &end {
            if start.seconds() >= end.seconds() {
                return Err(VidprepError::InvalidArgument(format!(
                    "start ({}) must be before end ({})",
                    start, end
                )));
            }
        }

        Ok(Self {
            start,
            end,
            frame_count,
            fps,
            resolution,
            quality,
            write_log: false,
        })
    }

    pub fn with_log(mut self, write_log: bool) -> Self {
        self.write_log = write_log;
        self
    }

    /// A frame count can only be turned into an fps with probe data
    pub fn needs_probe(&self) -> bool {
        self.frame_count.is_some()
    }
}

/// Planned grab: encoder call plus where the frames land
#[derive(Debug, Clone, Serialize)]
pub struct GrabPlan {
    pub output_dir: PathBuf,
    pub fps: Option<f64>,
    pub invocation: EncodeInvocation,
}

/// Grab planner
pub struct GrabPlanner;

impl GrabPlanner {
    pub fn plan(
        request: &GrabRequest,
        video: &Path,
        output_dir: &Path,
        descriptor: Option<&StreamDescriptor>,
    ) -> VidprepResult<GrabPlan> {
        let mut args = vec!["-ss".to_string(), request.start.to_string()];
        if let Some(end) = &request.end {
            args.extend(["-to".to_string(), end.to_string()]);
        }

        let fps = match (request.frame_count, request.fps) {
            (Some(count), _) => {
                let descriptor = descriptor.ok_or(VidprepError::IncompleteProbe {
                    field: "avg_frame_rate",
                })?;
                Some(OutputFpsCalculator::calc(
                    descriptor,
                    Some(&request.start),
                    request.end.as_ref(),
                    count,
                )?)
            }
            (None, Some(fps)) => Some(f64::from(fps)),
            (None, None) => None,
        };
        if let Some(fps) = fps {
            args.extend(["-vf".to_string(), VideoFilter::Fps(fps).to_string()]);
        }

        if let Some(resolution) = &request.resolution {
            args.extend(["-s".to_string(), resolution.clone()]);
        }
        args.extend(["-qscale:v".to_string(), request.quality.to_string()]);

        Ok(GrabPlan {
            output_dir: output_dir.to_path_buf(),
            fps,
            invocation: EncodeInvocation::new(video, args, output_dir.join(FRAME_PATTERN)),
        })
    }
}

/// `WIDTHxHEIGHT` with both sides positive
fn validate_resolution(resolution: &str) -> VidprepResult<()> {
    let valid = resolution
        .split_once('x')
        .map(|(w, h)| {
            matches!(w.parse::<u32>(), Ok(w) if w > 0) && matches!(h.parse::<u32>(), Ok(h) if h > 0)
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(VidprepError::InvalidArgument(format!(
            "resolution must look like 1280x720, got {}",
            resolution
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FrameRate;

    fn request(frame_count: Option<u32>, fps: Option<u32>) -> GrabRequest {
        GrabRequest::new(None, None, frame_count, fps, None, DEFAULT_QUALITY).unwrap()
    }

    #[test]
    fn test_rejects_fps_with_frame_count() {
        let err = GrabRequest::new(None, None, Some(10), Some(5), None, 2);
        assert!(matches!(err, Err(VidprepError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_quality_out_of_range() {
        assert!(GrabRequest::new(None, None, None, None, None, 0).is_err());
        assert!(GrabRequest::new(None, None, None, None, None, 32).is_err());
        assert!(GrabRequest::new(None, None, None, None, None, 31).is_ok());
    }

    #[test]
    fn test_rejects_bad_resolution() {
        assert!(GrabRequest::new(None, None, None, None, Some("1280:720".into()), 2).is_err());
        assert!(GrabRequest::new(None, None, None, None, Some("0x720".into()), 2).is_err());
        assert!(GrabRequest::new(None, None, None, None, Some("1280x720".into()), 2).is_ok());
    }

    #[test]
    fn test_plan_with_fixed_fps() {
        let plan = GrabPlanner::plan(
            &request(None, Some(5)),
            Path::new("game.mp4"),
            Path::new("frames"),
            None,
        )
        .unwrap();
        assert_eq!(
            plan.invocation.args,
            vec!["-ss", "00:00:00", "-vf", "fps=5", "-qscale:v", "2"]
        );
        assert_eq!(plan.invocation.output, Path::new("frames").join(FRAME_PATTERN));
    }

    #[test]
    fn test_plan_from_frame_count() {
        let mut descriptor = StreamDescriptor::new("h264");
        descriptor.duration_seconds = Some(200.0);
        descriptor.avg_frame_rate = FrameRate::new(25, 1);
        let req = GrabRequest::new(
            Some(Timestamp::parse("00:00:20").unwrap()),
            Some(Timestamp::parse("00:01:00").unwrap()),
            Some(20),
            None,
            Some("640x360".into()),
            4,
        )
        .unwrap();

        let plan = GrabPlanner::plan(&req, Path::new("a.mp4"), Path::new("out"), Some(&descriptor))
            .unwrap();
        assert_eq!(plan.fps, Some(0.5));
        assert_eq!(
            plan.invocation.args,
            vec![
                "-ss", "00:00:20", "-to", "00:01:00", "-vf", "fps=0.5", "-s", "640x360",
                "-qscale:v", "4"
            ]
        );
    }

    #[test]
    fn test_frame_count_without_probe_fails() {
        let err = GrabPlanner::plan(&request(Some(10), None), Path::new("a.mp4"), Path::new("o"), None);
        assert!(err.is_err());
    }
}
