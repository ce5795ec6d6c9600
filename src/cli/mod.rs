//! CLI module for vidprep
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{ClipsArgs, ConvertArgs, GrabArgs, PlanArgs, SampleArgs};

/// Video preparation toolkit
///
/// Normalizes video folders for downstream processing: stream-copies when
/// the source already fits, re-encodes otherwise, and samples frames for
/// spot checks.
#[derive(Parser, Debug)]
#[command(name = "vidprep")]
#[command(about = "Prepare video files with ffmpeg: convert, grab frames, cut clips")]
#[command(version)]
pub struct Cli {
    /// Config file (default: ./vidprep.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a folder of videos, stream-copying when possible
    Convert(ConvertArgs),
    /// Dump a window of a video as JPEG frames
    Grab(GrabArgs),
    /// Cut clips listed in an intervals file
    Clips(ClipsArgs),
    /// Show the transcode decision for a saved probe result
    Plan(PlanArgs),
    /// Draw sample frame indices
    Sample(SampleArgs),
}
