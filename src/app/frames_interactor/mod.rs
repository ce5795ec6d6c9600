// Frames interactor - Samples representative frames of a video into PNG files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::domain::model::{EncodeInvocation, FrameSampleSet};
use crate::error::{VidprepError, VidprepResult};
use crate::ports::{ExecutePort, ProbePort};
use crate::sampler::FrameSampler;
use crate::utils::path::PathUtils;

/// Interactor extracting sampled status frames
pub struct FramesInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    sampler: FrameSampler,
    amount: usize,
}

impl FramesInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        sampler: FrameSampler,
        amount: usize,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            sampler,
            amount,
        }
    }

    /// Sample frames of `video` into `<status_dir>/<stem>_frames/<index>.png`.
    ///
    /// A frame the encoder cannot produce is skipped and drawing continues,
    /// so the returned set may be smaller than requested.
    pub async fn extract<R: Rng + Send>(
        &self,
        video: &Path,
        status_dir: &Path,
        rng: &mut R,
    ) -> VidprepResult<FrameSampleSet> {
        let media = self.probe_port.probe(video).await?;
        let total_frames = media
            .descriptor
            .estimated_frame_count()
            .ok_or(VidprepError::IncompleteProbe { field: "nb_frames" })?;

        let frames_dir = PathUtils::frames_dir(status_dir, video)?;
        tokio::fs::create_dir_all(&frames_dir).await?;
        info!(
            "Extracting up to {} frames of {} into {}",
            self.amount,
            video.display(),
            frames_dir.display()
        );

        let mut draw = self.sampler.begin(total_frames, self.amount);
        while let Some(index) = draw.next_candidate(rng) {
            if self.extract_frame(video, &frames_dir, index).await {
                draw.accept(index);
            }
        }
        let set = draw.finish();
        info!("Extracted {} frames from {}", set.len(), video.display());
        Ok(set)
    }

    async fn extract_frame(&self, video: &Path, frames_dir: &Path, index: u64) -> bool {
        let output = frame_path(frames_dir, index);
        let invocation = EncodeInvocation::new(video, frame_args(index), &output);
        match self.execute_port.execute(&invocation).await {
            Ok(_) => {
                let written = tokio::fs::try_exists(&output).await.unwrap_or(false);
                if !written {
                    debug!(index, "Frame unavailable, skipping");
                }
                written
            }
            Err(e) => {
                debug!(index, error = %e, "Frame extraction failed, skipping");
                false
            }
        }
    }
}

/// Select exactly one decoded frame by number
pub fn frame_args(index: u64) -> Vec<String> {
    vec![
        "-vf".to_string(),
        format!("select=eq(n\\,{})", index),
        "-vframes".to_string(),
        "1".to_string(),
        "-y".to_string(),
    ]
}

pub fn frame_path(frames_dir: &Path, index: u64) -> PathBuf {
    frames_dir.join(format!("{}.png", index))
}
