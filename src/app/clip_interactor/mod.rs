// Clip interactor - Cuts one clip per interval listed in a text file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::clips;
use crate::domain::model::ClipInterval;
use crate::error::{VidprepError, VidprepResult};
use crate::planner::clip::ClipPlanner;
use crate::ports::ExecutePort;
use crate::utils::path::PathUtils;

/// Interactor for the clip extraction use case
pub struct ClipInteractor {
    execute_port: Arc<dyn ExecutePort>,
}

impl ClipInteractor {
    pub fn new(execute_port: Arc<dyn ExecutePort>) -> Self {
        Self { execute_port }
    }

    /// Read and validate the whole intervals file, then cut every clip.
    ///
    /// A malformed line fails the call before anything runs. Encoder
    /// failures are recorded per clip and the remaining clips still run.
    pub async fn execute(&self, request: &ClipsRequest) -> VidprepResult<ClipsResponse> {
        let content = tokio::fs::read_to_string(&request.intervals_file).await?;
        let intervals = clips::parse_str(&content)?;
        info!(
            "Cutting {} clips from {}",
            intervals.len(),
            request.video.display()
        );

        let clip_dir = request.output_dir.join(PathUtils::stem(&request.video)?);
        tokio::fs::create_dir_all(&clip_dir).await?;

        let planner = ClipPlanner::new(request.fast);
        let mut outcomes = Vec::with_capacity(intervals.len());
        for interval in intervals {
            let invocation = planner.plan(&request.video, &request.output_dir, &interval)?;
            let result = self
                .execute_port
                .execute(&invocation)
                .await
                .map(|_| invocation.output.clone());
            if let Err(e) = &result {
                error!("Clip {}-{} failed: {}", interval.start, interval.end, e);
            }
            outcomes.push(ClipOutcome { interval, result });
        }

        Ok(ClipsResponse { outcomes })
    }
}

/// Inputs of a clip run
#[derive(Debug, Clone)]
pub struct ClipsRequest {
    pub video: PathBuf,
    pub intervals_file: PathBuf,
    pub output_dir: PathBuf,
    pub fast: bool,
}

impl ClipsRequest {
    pub fn new(video: impl AsRef<Path>, intervals_file: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            video: video.as_ref().to_path_buf(),
            intervals_file: intervals_file.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            fast: false,
        }
    }

    pub fn fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }
}

#[derive(Debug)]
pub struct ClipOutcome {
    pub interval: ClipInterval,
    pub result: Result<PathBuf, VidprepError>,
}

#[derive(Debug, Default)]
pub struct ClipsResponse {
    pub outcomes: Vec<ClipOutcome>,
}

impl ClipsResponse {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}
