// Domain models - Core types and data structures

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::error::VidprepResult;
use crate::utils::time::TimeParser;

/// Source bitrate above which the video stream is always re-encoded
pub const MAX_VIDEO_BITRATE: u64 = 3_500_000;
/// Output height requested by the 720p scaling option
pub const TARGET_VIDEO_HEIGHT: u32 = 720;
/// Codec used when none is requested
pub const DEFAULT_CODEC: &str = "h264";
/// Encoder preset that is never emitted explicitly
pub const DEFAULT_PRESET: &str = "medium";
/// Canonical pixel format every re-encode is normalized to
pub const CANONICAL_PIXEL_FORMAT: &str = "yuv420p";

/// User-facing timestamp: the text as typed plus its value in seconds.
///
/// The text is what gets handed to the encoder and used in file names, the
/// seconds value is what arithmetic and validation use.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    raw: String,
    seconds: f64,
}

impl Timestamp {
    /// Parse a timestamp, keeping the trimmed text up to the first comma
    pub fn parse(time_str: &str) -> VidprepResult<Self> {
        let seconds = TimeParser::new().parse_time(time_str)?;
        let head = time_str.split(',').next().unwrap_or_default();
        Ok(Self {
            raw: head.trim().to_string(),
            seconds,
        })
    }

    /// `00:00:00`
    pub fn zero() -> Self {
        Self {
            raw: "00:00:00".to_string(),
            seconds: 0.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Rational frame rate as reported by the prober (`"30000/1001"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl FrameRate {
    /// Create a frame rate; zero denominators are rejected
    pub fn new(num: u64, den: u64) -> Option<Self> {
        (den != 0).then_some(Self { num, den })
    }

    /// Parse the `N/D` form. `0/0` and other unusable values yield `None`.
    pub fn parse(rate: &str) -> Option<Self> {
        let (num, den) = rate.trim().split_once('/')?;
        let num = num.trim().parse::<u64>().ok()?;
        let den = den.trim().parse::<u64>().ok()?;
        if num == 0 {
            return None;
        }
        Self::new(num, den)
    }

    /// Convert to frames per second
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Container-level probe information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerInfo {
    pub format_name: String,
    pub duration_seconds: Option<f64>,
}

/// Normalized description of the first video and first audio stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamDescriptor {
    pub video_codec: String,
    pub pixel_format: Option<String>,
    pub height_pixels: Option<u32>,
    pub bit_rate_bps: Option<u64>,
    pub start_time_seconds: Option<f64>,
    pub has_b_frames: u32,
    pub audio_codec: Option<String>,
    pub duration_seconds: Option<f64>,
    pub avg_frame_rate: Option<FrameRate>,
    pub frame_count: Option<u64>,
}

impl StreamDescriptor {
    /// Descriptor with only the codec known
    pub fn new(video_codec: impl Into<String>) -> Self {
        Self {
            video_codec: video_codec.into(),
            pixel_format: None,
            height_pixels: None,
            bit_rate_bps: None,
            start_time_seconds: None,
            has_b_frames: 0,
            audio_codec: None,
            duration_seconds: None,
            avg_frame_rate: None,
            frame_count: None,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio_codec.is_some()
    }

    /// Native frame rate in frames per second
    pub fn native_fps(&self) -> Option<f64> {
        self.avg_frame_rate.map(|rate| rate.as_f64())
    }

    /// Total frame count, falling back to duration times native fps
    pub fn estimated_frame_count(&self) -> Option<u64> {
        if let Some(count) = self.frame_count.filter(|count| *count > 0) {
            return Some(count);
        }
        let duration = self.duration_seconds?;
        let fps = self.native_fps()?;
        let estimate = (duration * fps).floor();
        (estimate >= 1.0).then_some(estimate as u64)
    }
}

/// Result of probing one source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbedMedia {
    pub container: ContainerInfo,
    pub descriptor: StreamDescriptor,
}

/// What the user asked the transcode to produce
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeRequest {
    pub target_codec: String,
    pub target_fps: Option<u32>,
    pub target_preset: String,
    pub scale_to_720: bool,
    pub target_bitrate: Option<String>,
    pub max_bitrate_bps: u64,
    pub trim_start: Option<Timestamp>,
    pub trim_end: Option<Timestamp>,
}

impl Default for TranscodeRequest {
    fn default() -> Self {
        Self {
            target_codec: DEFAULT_CODEC.to_string(),
            target_fps: None,
            target_preset: DEFAULT_PRESET.to_string(),
            scale_to_720: false,
            target_bitrate: None,
            max_bitrate_bps: MAX_VIDEO_BITRATE,
            trim_start: None,
            trim_end: None,
        }
    }
}

impl TranscodeRequest {
    pub fn has_trim(&self) -> bool {
        self.trim_start.is_some() || self.trim_end.is_some()
    }
}

/// One per-frame transformation of the video filter graph
#[derive(Debug, Clone, PartialEq)]
pub enum VideoFilter {
    /// `format=<pix_fmt>`
    PixelFormat(String),
    /// `fps=<rate>`
    Fps(f64),
    /// `scale=-2:<height>`, width chosen to keep the aspect ratio
    ScaleToHeight(u32),
}

impl fmt::Display for VideoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoFilter::PixelFormat(format) => write!(f, "format={}", format),
            VideoFilter::Fps(rate) => write!(f, "fps={}", rate),
            VideoFilter::ScaleToHeight(height) => write!(f, "scale=-2:{}", height),
        }
    }
}

/// Ordered video filter graph, rendered comma-joined
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    filters: Vec<VideoFilter>,
}

impl FilterChain {
    pub(crate) fn from_filters(filters: Vec<VideoFilter>) -> Self {
        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filters(&self) -> &[VideoFilter] {
        &self.filters
    }

    /// `-vf <chain>` tokens, or nothing for an empty chain
    pub fn to_args(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        vec!["-vf".to_string(), self.to_string()]
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", filter)?;
        }
        Ok(())
    }
}

impl Serialize for FilterChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why the video stream cannot be stream-copied, in check order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReencodeReason {
    FiltersRequired,
    TrimRequested,
    CodecMismatch { source: String, family: String },
    BitrateUnknown,
    BitrateAboveCap { bit_rate: u64, cap: u64 },
    StartTimeOffset { seconds: f64 },
    BFrames { count: u32 },
}

impl fmt::Display for ReencodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReencodeReason::FiltersRequired => write!(f, "video filters required"),
            ReencodeReason::TrimRequested => write!(f, "trim window requested"),
            ReencodeReason::CodecMismatch { source, family } => {
                write!(f, "source codec {} is not in the {} family", source, family)
            }
            ReencodeReason::BitrateUnknown => write!(f, "source bitrate unknown"),
            ReencodeReason::BitrateAboveCap { bit_rate, cap } => {
                write!(f, "source bitrate {} exceeds cap {}", bit_rate, cap)
            }
            ReencodeReason::StartTimeOffset { seconds } => {
                write!(f, "source starts at {}s instead of 0", seconds)
            }
            ReencodeReason::BFrames { count } => write!(f, "source has {} B-frames", count),
        }
    }
}

/// Output of the transcode policy: everything the encoder needs besides paths
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeDecision {
    pub reencode_video: bool,
    pub reason: Option<ReencodeReason>,
    pub video_codec: Option<String>,
    pub filter_chain: FilterChain,
    pub trim_args: Vec<String>,
    pub audio_args: Vec<String>,
    pub extra_args: Vec<String>,
}

impl EncodeDecision {
    /// Video tokens: `-codec:v <codec> -bf 0 [-vf <chain>]` or `-c:v copy`
    pub fn video_args(&self) -> Vec<String> {
        match (&self.video_codec, self.reencode_video) {
            (Some(codec), true) => {
                let mut args = vec![
                    "-codec:v".to_string(),
                    codec.clone(),
                    "-bf".to_string(),
                    "0".to_string(),
                ];
                args.extend(self.filter_chain.to_args());
                args
            }
            _ => vec!["-c:v".to_string(), "copy".to_string()],
        }
    }

    /// Full encoder argument list, between input and output paths
    pub fn args(&self) -> Vec<String> {
        let mut args = self.trim_args.clone();
        args.extend(self.video_args());
        args.extend(self.audio_args.iter().cloned());
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

/// Sampled frame numbers, unique and ordered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameSampleSet {
    pub indices: BTreeSet<u64>,
    pub min_bound: u64,
    pub max_bound: u64,
    pub attempts: u32,
}

impl FrameSampleSet {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: u64) -> bool {
        self.indices.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.indices.iter().copied()
    }
}

/// One `(start, end)` clip window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipInterval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ClipInterval {
    pub fn duration_seconds(&self) -> f64 {
        self.end.seconds() - self.start.seconds()
    }
}

/// A fully formed encoder call handed to the executor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeInvocation {
    pub input: Option<PathBuf>,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl EncodeInvocation {
    pub fn new(input: impl Into<PathBuf>, args: Vec<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: Some(input.into()),
            args,
            output: output.into(),
        }
    }

    /// Argument vector after the program name
    pub fn command_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args.len() + 3);
        if let Some(input) = &self.input {
            line.push("-i".to_string());
            line.push(input.to_string_lossy().to_string());
        }
        line.extend(self.args.iter().cloned());
        line.push(self.output.to_string_lossy().to_string());
        line
    }
}

#[cfg(test)]
mod tests;
