//! vidprep library
//!
//! Decides per file whether a video can be stream-copied or must be
//! re-encoded, builds the matching ffmpeg argument list, and samples
//! representative frames for visual spot checks. The external prober and
//! encoder sit behind the [`ports`] traits.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod clips;
pub mod domain;
pub mod error;
pub mod planner;
pub mod ports;
pub mod probe;
pub mod sampler;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{
    ClipInterval, EncodeDecision, EncodeInvocation, FrameSampleSet, ProbedMedia, StreamDescriptor,
    Timestamp, TranscodeRequest,
};
pub use error::{VidprepError, VidprepResult};
