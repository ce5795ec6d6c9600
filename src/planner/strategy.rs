//! Copy-versus-re-encode policy

use tracing::{debug, info};

use crate::domain::model::{
    EncodeDecision, FilterChain, ReencodeReason, StreamDescriptor, TranscodeRequest,
    DEFAULT_PRESET,
};
use crate::error::{VidprepError, VidprepResult};
use crate::planner::filters::FilterChainBuilder;

/// Audio bitstream filter turning ADTS AAC into the form MP4 expects
const AAC_ADTS_TO_ASC: &str = "aac_adtstoasc";

/// Strategy planner deciding how the video stream reaches the output
pub struct TranscodePlanner;

impl TranscodePlanner {
    /// Create a new transcode planner
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }

    /// Decide between stream copy and re-encode and build the argument set
    pub fn decide(
        &self,
        descriptor: &StreamDescriptor,
        request: &TranscodeRequest,
    ) -> VidprepResult<EncodeDecision> {
        self.validate_request(request)?;

        let filter_chain = FilterChainBuilder::for_request(descriptor, request).build();
        let reason = self.reencode_reason(descriptor, request, &filter_chain);
        let reencode_video = reason.is_some();

        match &reason {
            Some(reason) => info!(
                codec = %request.target_codec,
                "Re-encoding video: {}",
                reason
            ),
            None => info!(codec = %descriptor.video_codec, "Copying video stream"),
        }

        let mut trim_args = Vec::new();
        if let Some(start) = &request.trim_start {
            trim_args.extend(["-ss".to_string(), start.to_string()]);
        }
        if let Some(end) = &request.trim_end {
            trim_args.extend(["-to".to_string(), end.to_string()]);
        }

        let audio_args = if descriptor.has_audio() {
            vec!["-bsf:a".to_string(), AAC_ADTS_TO_ASC.to_string()]
        } else {
            vec!["-an".to_string()]
        };

        let mut extra_args = Vec::new();
        if request.target_preset != DEFAULT_PRESET {
            extra_args.extend(["-preset".to_string(), request.target_preset.clone()]);
        }
        // copy mode cannot honor a bitrate
        if reencode_video {
            if let Some(bitrate) = &request.target_bitrate {
                extra_args.extend(["-b:v".to_string(), bitrate.clone()]);
            }
        }

        let decision = EncodeDecision {
            reencode_video,
            reason,
            video_codec: reencode_video.then(|| request.target_codec.clone()),
            filter_chain,
            trim_args,
            audio_args,
            extra_args,
        };

        debug!(args = ?decision.args(), "Encode decision");
        Ok(decision)
    }

    /// First condition that rules out a stream copy, in priority order
    fn reencode_reason(
        &self,
        descriptor: &StreamDescriptor,
        request: &TranscodeRequest,
        filter_chain: &FilterChain,
    ) -> Option<ReencodeReason> {
        if !filter_chain.is_empty() {
            return Some(ReencodeReason::FiltersRequired);
        }
        if request.has_trim() {
            return Some(ReencodeReason::TrimRequested);
        }

        let family = codec_family(&request.target_codec);
        if !descriptor.video_codec.to_lowercase().contains(&family) {
            return Some(ReencodeReason::CodecMismatch {
                source: descriptor.video_codec.clone(),
                family,
            });
        }

        match descriptor.bit_rate_bps {
            None => return Some(ReencodeReason::BitrateUnknown),
            Some(bit_rate) if bit_rate > request.max_bitrate_bps => {
                return Some(ReencodeReason::BitrateAboveCap {
                    bit_rate,
                    cap: request.max_bitrate_bps,
                })
            }
            Some(_) => {}
        }

        if let Some(start) = descriptor.start_time_seconds {
            if start != 0.0 {
                return Some(ReencodeReason::StartTimeOffset { seconds: start });
            }
        }

        if descriptor.has_b_frames != 0 {
            return Some(ReencodeReason::BFrames {
                count: descriptor.has_b_frames,
            });
        }

        None
    }

    fn validate_request(&self, request: &TranscodeRequest) -> VidprepResult<()> {
        if request.target_codec.trim().is_empty() {
            return Err(VidprepError::InvalidArgument(
                "Target codec cannot be empty".to_string(),
            ));
        }
        if request.target_preset.trim().is_empty() {
            return Err(VidprepError::InvalidArgument(
                "Preset cannot be empty".to_string(),
            ));
        }
        if request.target_fps == Some(0) {
            return Err(VidprepError::InvalidArgument(
                "Target fps must be positive".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (&request.trim_start, &request.trim_end) {
            if start.seconds() >= end.seconds() {
                return Err(VidprepError::InvalidArgument(format!(
                    "Trim start ({}) must be before trim end ({})",
                    start, end
                )));
            }
        }
        Ok(())
    }
}

/// Codec family an encoder name belongs to: `h264_nvenc` and `libx264`
/// both encode `h264`.
///
/// Names not listed here map to the text before their first `_`, so an
/// unknown software encoder maps to itself. A source whose codec name does
/// not contain that family is always re-encoded.
pub fn codec_family(codec: &str) -> String {
    let codec = codec.trim().to_lowercase();
    let family = match codec.as_str() {
        "libx264" | "libx264rgb" | "libopenh264" | "avc" => "h264",
        "libxvid" => "mpeg4",
        "libx265" | "h265" => "hevc",
        "libvpx" => "vp8",
        "libvpx-vp9" => "vp9",
        "libaom-av1" | "libsvtav1" | "librav1e" => "av1",
        other => other.split('_').next().unwrap_or(other),
    };
    family.to_string()
}
