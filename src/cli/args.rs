//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::Timestamp;
use crate::planner::grab::DEFAULT_QUALITY;

/// `HH:MM:SS`, `MM:SS` or plain seconds
fn parse_timestamp(value: &str) -> Result<Timestamp, String> {
    Timestamp::parse(value).map_err(|e| e.to_string())
}

fn parse_quality(value: &str) -> Result<u8, String> {
    clap_num::number_range(value, 1, 31)
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Folder with source videos
    pub source_dir: PathBuf,

    /// Folder receiving converted videos
    pub destination_dir: PathBuf,

    /// Process only this file of the source folder
    #[arg(long)]
    pub file: Option<String>,

    /// Bitrate used when re-encoding (e.g. 3.3M)
    #[arg(short, long)]
    pub bitrate: Option<String>,

    /// Source bitrate (bits/s) above which the video is re-encoded
    #[arg(long)]
    pub max_bitrate: Option<u64>,

    /// Target frame rate
    #[arg(short, long)]
    pub fps: Option<u32>,

    /// Encoder speed preset
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Folder receiving sampled status frames
    #[arg(short, long)]
    pub status_folder: Option<PathBuf>,

    /// Only sample status frames from the sources
    #[arg(short, long, requires = "status_folder")]
    pub extract_only: bool,

    /// Video codec (h264 for CPU, h264_nvenc for GPU)
    #[arg(short, long)]
    pub codec: Option<String>,

    /// Trim start
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<Timestamp>,

    /// Trim end
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<Timestamp>,

    /// Scale to 720 pixels in height, keeping the aspect ratio
    #[arg(long = "scale-720", overrides_with = "no_scale_720")]
    pub scale_720: bool,

    #[arg(long = "no-scale-720", overrides_with = "scale_720")]
    pub no_scale_720: bool,

    /// Concurrent conversions
    #[arg(long)]
    pub workers: Option<usize>,

    /// Seed for status frame sampling
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the grab command
#[derive(Args, Debug)]
pub struct GrabArgs {
    /// Video to grab frames from
    #[arg(short, long)]
    pub video: PathBuf,

    /// Output folder (default: next to the video, named after it)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Window start
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<Timestamp>,

    /// Window end
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<Timestamp>,

    /// Number of frames to grab from the window
    #[arg(short, long, conflicts_with = "fps")]
    pub num: Option<u32>,

    /// Frames per second to grab
    #[arg(long)]
    pub fps: Option<u32>,

    /// Output size, e.g. 1280x720
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// JPEG quality, 1 (best) to 31
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = parse_quality)]
    pub quality: u8,

    /// Do not write grab_log.txt
    #[arg(long)]
    pub no_log: bool,
}

/// Arguments for the clips command
#[derive(Args, Debug)]
pub struct ClipsArgs {
    /// Video to cut
    #[arg(short, long)]
    pub video: PathBuf,

    /// Text file with one `start, end` pair per line
    #[arg(short, long)]
    pub intervals: PathBuf,

    /// Output folder; clips land in `<output>/<video name>/`
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Stream-copy instead of re-encoding (short clips may start with artifacts)
    #[arg(short, long)]
    pub fast: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// ffprobe JSON output (`-print_format json -show_format -show_streams`)
    #[arg(long)]
    pub probe_json: PathBuf,

    #[arg(short, long)]
    pub codec: Option<String>,

    #[arg(short, long)]
    pub fps: Option<u32>,

    #[arg(short, long)]
    pub preset: Option<String>,

    #[arg(short, long)]
    pub bitrate: Option<String>,

    #[arg(long)]
    pub max_bitrate: Option<u64>,

    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<Timestamp>,

    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<Timestamp>,

    #[arg(long = "scale-720")]
    pub scale_720: bool,

    /// Print the decision as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the sample command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Frame count of the video
    #[arg(long)]
    pub frames: u64,

    /// Indices to draw (default: status_frames from config)
    #[arg(short, long)]
    pub amount: Option<usize>,

    /// Draw attempts (default: max_sample_attempts from config)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// RNG seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
}
