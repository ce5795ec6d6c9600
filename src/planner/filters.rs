//! Video filter chain assembly

use crate::domain::model::{
    FilterChain, StreamDescriptor, TranscodeRequest, VideoFilter, CANONICAL_PIXEL_FORMAT,
    TARGET_VIDEO_HEIGHT,
};

/// Builder for the `-vf` expression.
///
/// Filters always come out as pixel format, then fps, then scale, no matter
/// in which order the setters were called.
#[derive(Debug, Clone, Default)]
pub struct FilterChainBuilder {
    pixel_format: Option<String>,
    fps: Option<f64>,
    scale_height: Option<u32>,
}

impl FilterChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the filters a transcode of `descriptor` needs to satisfy `request`
    pub fn for_request(descriptor: &StreamDescriptor, request: &TranscodeRequest) -> Self {
        let mut builder = Self::new();

        if descriptor.pixel_format.as_deref() != Some(CANONICAL_PIXEL_FORMAT) {
            builder = builder.pixel_format(CANONICAL_PIXEL_FORMAT);
        }
        if let Some(fps) = request.target_fps {
            builder = builder.fps(f64::from(fps));
        }
        // unknown height counts as "not already 720"
        if request.scale_to_720 && descriptor.height_pixels != Some(TARGET_VIDEO_HEIGHT) {
            builder = builder.scale_to_height(TARGET_VIDEO_HEIGHT);
        }

        builder
    }

    pub fn pixel_format(mut self, format: impl Into<String>) -> Self {
        self.pixel_format = Some(format.into());
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }

    pub fn scale_to_height(mut self, height: u32) -> Self {
        self.scale_height = Some(height);
        self
    }

    pub fn build(self) -> FilterChain {
        let mut filters = Vec::with_capacity(3);
        if let Some(format) = self.pixel_format {
            filters.push(VideoFilter::PixelFormat(format));
        }
        if let Some(fps) = self.fps {
            filters.push(VideoFilter::Fps(fps));
        }
        if let Some(height) = self.scale_height {
            filters.push(VideoFilter::ScaleToHeight(height));
        }
        FilterChain::from_filters(filters)
    }
}
