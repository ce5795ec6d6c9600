// Grab interactor - Dumps a window of a video as numbered JPEG frames

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::error::VidprepResult;
use crate::planner::grab::{GrabPlan, GrabPlanner, GrabRequest, GRAB_LOG_FILE};
use crate::ports::{ExecutePort, ProbePort};
use crate::utils::path::PathUtils;

/// Interactor for the frame grab use case
pub struct GrabInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
}

impl GrabInteractor {
    /// Create new grab interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, execute_port: Arc<dyn ExecutePort>) -> Self {
        Self {
            probe_port,
            execute_port,
        }
    }

    /// Plan and run a grab; `output_dir` defaults to `<video dir>/<video stem>`
    pub async fn execute(
        &self,
        video: &Path,
        output_dir: Option<PathBuf>,
        request: &GrabRequest,
    ) -> VidprepResult<GrabPlan> {
        let output_dir = match output_dir {
            Some(dir) => dir,
            None => PathUtils::default_grab_dir(video)?,
        };

        // Only a frame count needs the stream's rate and duration
        let media = if request.needs_probe() {
            Some(self.probe_port.probe(video).await?)
        } else {
            None
        };

        let plan = GrabPlanner::plan(
            request,
            video,
            &output_dir,
            media.as_ref().map(|m| &m.descriptor),
        )?;

        tokio::fs::create_dir_all(&plan.output_dir).await?;
        if request.write_log {
            let line = format!("ffmpeg {}\n", plan.invocation.command_line().join(" "));
            tokio::fs::write(plan.output_dir.join(GRAB_LOG_FILE), line).await?;
        }

        self.execute_port.execute(&plan.invocation).await?;
        info!("Frames written to {}", plan.output_dir.display());
        Ok(plan)
    }
}
