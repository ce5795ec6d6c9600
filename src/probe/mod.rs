//! Probe output parsing
//!
//! Turns the JSON printed by `ffprobe -print_format json -show_format
//! -show_streams` into a [`ProbedMedia`]. Only the first video stream and the
//! first audio stream are looked at; later streams of the same type are
//! ignored.

use serde::Deserialize;
use tracing::debug;

use crate::domain::model::{ContainerInfo, FrameRate, ProbedMedia, StreamDescriptor};
use crate::error::{VidprepError, VidprepResult};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    pix_fmt: Option<String>,
    height: Option<Numeric>,
    bit_rate: Option<Numeric>,
    start_time: Option<Numeric>,
    has_b_frames: Option<Numeric>,
    duration: Option<Numeric>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<Numeric>,
}

/// ffprobe prints most numbers as strings, but hand-written or converted
/// probe data often carries real JSON numbers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Numeric::Int(v) => *v as f64,
            Numeric::Float(v) => *v,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn as_u64(&self) -> Option<u64> {
        match self {
            Numeric::Int(v) => u64::try_from(*v).ok(),
            Numeric::Float(v) if *v >= 0.0 && v.is_finite() => Some(*v as u64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => s.trim().parse::<u64>().ok(),
        }
    }
}

/// Parse raw probe JSON text
pub fn parse_probe_json(json: &str) -> VidprepResult<ProbedMedia> {
    let output: FfprobeOutput = serde_json::from_str(json)?;
    build_media(output)
}

/// Parse an already decoded probe document
pub fn parse_probe_value(value: serde_json::Value) -> VidprepResult<ProbedMedia> {
    let output: FfprobeOutput = serde_json::from_value(value)?;
    build_media(output)
}

fn build_media(output: FfprobeOutput) -> VidprepResult<ProbedMedia> {
    let container = match output.format {
        Some(format) => ContainerInfo {
            format_name: format.format_name.unwrap_or_default(),
            duration_seconds: format.duration.as_ref().and_then(Numeric::as_f64),
        },
        None => ContainerInfo {
            format_name: String::new(),
            duration_seconds: None,
        },
    };

    let mut video: Option<&FfprobeStream> = None;
    let mut audio: Option<&FfprobeStream> = None;
    for stream in &output.streams {
        match stream.codec_type.as_deref() {
            Some("video") if video.is_none() => video = Some(stream),
            Some("audio") if audio.is_none() => audio = Some(stream),
            _ => {}
        }
    }

    let video = video.ok_or(VidprepError::MissingVideoStream)?;
    let video_codec = video
        .codec_name
        .clone()
        .ok_or(VidprepError::MissingVideoStream)?;

    let duration_seconds = video
        .duration
        .as_ref()
        .and_then(Numeric::as_f64)
        .or(container.duration_seconds);

    let descriptor = StreamDescriptor {
        video_codec,
        pixel_format: video.pix_fmt.clone(),
        height_pixels: video
            .height
            .as_ref()
            .and_then(Numeric::as_u64)
            .and_then(|h| u32::try_from(h).ok()),
        bit_rate_bps: video.bit_rate.as_ref().and_then(Numeric::as_u64),
        start_time_seconds: video.start_time.as_ref().and_then(Numeric::as_f64),
        has_b_frames: video
            .has_b_frames
            .as_ref()
            .and_then(Numeric::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        audio_codec: audio.and_then(|stream| stream.codec_name.clone()),
        duration_seconds,
        avg_frame_rate: video.avg_frame_rate.as_deref().and_then(FrameRate::parse),
        frame_count: video.nb_frames.as_ref().and_then(Numeric::as_u64),
    };

    debug!(
        format = %container.format_name,
        codec = %descriptor.video_codec,
        audio = ?descriptor.audio_codec,
        "Parsed probe output"
    );

    Ok(ProbedMedia {
        container,
        descriptor,
    })
}
