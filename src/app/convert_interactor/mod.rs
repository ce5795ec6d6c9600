// Convert interactor - Batch conversion of a folder of videos

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::app::frames_interactor::FramesInteractor;
use crate::domain::model::{EncodeDecision, EncodeInvocation, FrameSampleSet, TranscodeRequest};
use crate::error::{VidprepError, VidprepResult};
use crate::planner::TranscodePlanner;
use crate::ports::{ExecutePort, ProbePort};
use crate::utils::path::PathUtils;
use crate::utils::Utils;

/// Container of converted files
const CONVERTED_EXTENSION: &str = ".mp4";

/// Interactor for the batch conversion use case
pub struct ConvertInteractor {
    probe_port: Arc<dyn ProbePort>,
    execute_port: Arc<dyn ExecutePort>,
    frames: FramesInteractor,
    workers: usize,
}

impl ConvertInteractor {
    /// Create new convert interactor; `workers` bounds concurrent encodes
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        frames: FramesInteractor,
        workers: usize,
    ) -> Self {
        Self {
            probe_port,
            execute_port,
            frames,
            workers: workers.max(1),
        }
    }

    /// Probe, decide and encode a single file
    pub async fn convert_file(
        &self,
        source: &Path,
        destination: &Path,
        request: &TranscodeRequest,
    ) -> VidprepResult<EncodeDecision> {
        convert_one(
            self.probe_port.as_ref(),
            self.execute_port.as_ref(),
            source,
            destination,
            request,
        )
        .await
    }

    /// Convert every listed source, then sample status frames.
    ///
    /// One file failing never stops the others; the response carries a
    /// result per source in listing order.
    pub async fn execute(&self, request: &ConvertRequest) -> VidprepResult<ConvertResponse> {
        let started = Instant::now();
        let sources = list_sources(&request.source_dir, request.file.as_deref())?;
        info!(
            "Found {} source files in {}",
            sources.len(),
            request.source_dir.display()
        );

        let outcomes = if request.extract_only {
            Vec::new()
        } else {
            tokio::fs::create_dir_all(&request.destination_dir).await?;
            self.convert_all(&sources, request).await?
        };

        let mut status = Vec::new();
        if let Some(status_dir) = &request.status_dir {
            let videos: Vec<PathBuf> = if request.extract_only {
                sources.clone()
            } else {
                outcomes
                    .iter()
                    .filter(|o| o.result.is_ok())
                    .map(|o| o.destination.clone())
                    .collect()
            };
            status = self.sample_status(&videos, status_dir, request.seed).await;
        }

        let elapsed = started.elapsed();
        info!("Finished in {}", Utils::format_duration(elapsed));
        Ok(ConvertResponse {
            outcomes,
            status,
            elapsed,
        })
    }

    async fn convert_all(
        &self,
        sources: &[PathBuf],
        request: &ConvertRequest,
    ) -> VidprepResult<Vec<FileOutcome>> {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (position, source) in sources.iter().enumerate() {
            let destination = PathUtils::converted_destination(
                &request.destination_dir,
                source,
                CONVERTED_EXTENSION,
            )?;
            let source = source.clone();
            let transcode = request.transcode.clone();
            let probe_port = Arc::clone(&self.probe_port);
            let execute_port = Arc::clone(&self.execute_port);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        convert_one(
                            probe_port.as_ref(),
                            execute_port.as_ref(),
                            &source,
                            &destination,
                            &transcode,
                        )
                        .await
                    }
                    Err(e) => Err(VidprepError::InvalidArgument(e.to_string())),
                };
                if let Err(e) = &result {
                    warn!("{} failed: {}", source.display(), e);
                }
                (
                    position,
                    FileOutcome {
                        source,
                        destination,
                        result,
                    },
                )
            });
        }

        let mut finished = Vec::with_capacity(sources.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => finished.push(entry),
                Err(e) => error!("Conversion task aborted: {}", e),
            }
        }
        finished.sort_by_key(|(position, _)| *position);
        Ok(finished.into_iter().map(|(_, outcome)| outcome).collect())
    }

    async fn sample_status(
        &self,
        videos: &[PathBuf],
        status_dir: &Path,
        seed: Option<u64>,
    ) -> Vec<StatusOutcome> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut status = Vec::with_capacity(videos.len());
        for video in videos {
            let result = self.frames.extract(video, status_dir, &mut rng).await;
            if let Err(e) = &result {
                warn!("No status frames for {}: {}", video.display(), e);
            }
            status.push(StatusOutcome {
                video: video.clone(),
                result,
            });
        }
        status
    }
}

async fn convert_one(
    probe_port: &dyn ProbePort,
    execute_port: &dyn ExecutePort,
    source: &Path,
    destination: &Path,
    request: &TranscodeRequest,
) -> VidprepResult<EncodeDecision> {
    let media = probe_port.probe(source).await?;
    let decision = TranscodePlanner::new().decide(&media.descriptor, request)?;
    let mut args = decision.args();
    args.push("-y".to_string());
    execute_port
        .execute(&EncodeInvocation::new(source, args, destination))
        .await?;
    info!("Converted {} -> {}", source.display(), destination.display());
    Ok(decision)
}

/// Regular files directly inside `dir`, sorted by name, or just `dir/file`
pub fn list_sources(dir: &Path, file: Option<&str>) -> VidprepResult<Vec<PathBuf>> {
    if let Some(file) = file {
        return Ok(vec![dir.join(file)]);
    }
    let mut sources = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| VidprepError::IoError(e.into()))?;
        if entry.file_type().is_file() {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

/// Inputs of a batch conversion
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    /// Convert only this file of `source_dir`
    pub file: Option<String>,
    pub transcode: TranscodeRequest,
    pub status_dir: Option<PathBuf>,
    /// Skip conversion and sample the sources themselves
    pub extract_only: bool,
    pub seed: Option<u64>,
}

impl ConvertRequest {
    pub fn new(source_dir: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
            file: None,
            transcode: TranscodeRequest::default(),
            status_dir: None,
            extract_only: false,
            seed: None,
        }
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub result: VidprepResult<EncodeDecision>,
}

#[derive(Debug)]
pub struct StatusOutcome {
    pub video: PathBuf,
    pub result: VidprepResult<FrameSampleSet>,
}

#[derive(Debug)]
pub struct ConvertResponse {
    pub outcomes: Vec<FileOutcome>,
    pub status: Vec<StatusOutcome>,
    pub elapsed: Duration,
}

impl ConvertResponse {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }
}
