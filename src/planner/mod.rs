//! Encoder argument planning
//!
//! Everything here is a pure function of probe data and user options; no
//! process is spawned.

pub mod clip;
pub mod filters;
pub mod fps;
pub mod grab;
pub mod strategy;

pub use clip::ClipPlanner;
pub use filters::FilterChainBuilder;
pub use fps::OutputFpsCalculator;
pub use grab::{GrabPlan, GrabPlanner, GrabRequest};
pub use strategy::{codec_family, TranscodePlanner};
