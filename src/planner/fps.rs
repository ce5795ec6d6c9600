//! Output frame rate for a target frame count

use tracing::debug;

use crate::domain::model::{StreamDescriptor, Timestamp};
use crate::error::{VidprepError, VidprepResult};

/// Derives the fps that yields roughly `target_frame_count` frames over a
/// trimmed window, never exceeding the source's native rate
pub struct OutputFpsCalculator;

impl OutputFpsCalculator {
    pub fn calc(
        descriptor: &StreamDescriptor,
        trim_start: Option<&Timestamp>,
        trim_end: Option<&Timestamp>,
        target_frame_count: u32,
    ) -> VidprepResult<f64> {
        if target_frame_count == 0 {
            return Err(VidprepError::InvalidArgument(
                "Target frame count must be positive".to_string(),
            ));
        }

        let native_fps = descriptor
            .native_fps()
            .ok_or(VidprepError::IncompleteProbe {
                field: "avg_frame_rate",
            })?;
        let mut duration = descriptor
            .duration_seconds
            .ok_or(VidprepError::IncompleteProbe { field: "duration" })?;

        if let Some(end) = trim_end {
            if end.seconds() <= duration {
                duration = end.seconds();
            }
        }
        let start = trim_start.map(Timestamp::seconds).unwrap_or(0.0);
        let effective = duration - start;
        if effective <= 0.0 {
            return Err(VidprepError::InvalidDuration {
                duration: effective,
            });
        }

        let raw_fps = f64::from(target_frame_count) / effective;
        let fps = raw_fps.min(native_fps);
        debug!(
            effective_duration = effective,
            raw_fps, native_fps, fps, "Computed output fps"
        );
        Ok(fps)
    }
}
