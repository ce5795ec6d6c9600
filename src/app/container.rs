use std::sync::Arc;

use crate::adapters::{AppConfig, FfmpegAdapter, FfprobeAdapter};
use crate::app::{
    clip_interactor::ClipInteractor, convert_interactor::ConvertInteractor,
    frames_interactor::FramesInteractor, grab_interactor::GrabInteractor,
};
use crate::ports::{ExecutePort, ProbePort};
use crate::sampler::FrameSampler;

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn grab_interactor(&self) -> Arc<GrabInteractor>;
    fn clip_interactor(&self) -> Arc<ClipInteractor>;
}

pub struct DefaultAppContainer {
    convert_interactor: Arc<ConvertInteractor>,
    grab_interactor: Arc<GrabInteractor>,
    clip_interactor: Arc<ClipInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe/ffmpeg adapters named by `config`
    pub fn new(config: &AppConfig) -> Self {
        let probe_port = Arc::new(FfprobeAdapter::new(&config.ffprobe_path, config.timeout()));
        let execute_port = Arc::new(FfmpegAdapter::new(&config.ffmpeg_path, config.timeout()));
        Self::with_ports(probe_port, execute_port, config)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        config: &AppConfig,
    ) -> Self {
        let sampler = FrameSampler::new().with_max_attempts(config.max_sample_attempts);
        let frames = FramesInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            sampler,
            config.status_frames,
        );

        let convert_interactor = Arc::new(ConvertInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            frames,
            config.workers,
        ));
        let grab_interactor = Arc::new(GrabInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
        ));
        let clip_interactor = Arc::new(ClipInteractor::new(Arc::clone(&execute_port)));

        Self {
            convert_interactor,
            grab_interactor,
            clip_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn grab_interactor(&self) -> Arc<GrabInteractor> {
        Arc::clone(&self.grab_interactor)
    }

    fn clip_interactor(&self) -> Arc<ClipInteractor> {
        Arc::clone(&self.clip_interactor)
    }
}
