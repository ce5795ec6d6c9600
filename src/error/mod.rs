//! Error handling module for vidprep

use thiserror::Error;

/// Main error type for vidprep operations
#[derive(Error, Debug)]
pub enum VidprepError {
    /// Probe succeeded but the source carries no usable video stream
    #[error("No valid video stream found")]
    MissingVideoStream,

    /// Trimmed duration is zero or negative
    #[error("Invalid effective duration: {duration:.3}s (must be positive)")]
    InvalidDuration { duration: f64 },

    /// A probe field required by the current computation is absent
    #[error("Probe output is missing required field: {field}")]
    IncompleteProbe { field: &'static str },

    /// External probe collaborator failed
    #[error("Failed to probe {source_path}: {message}")]
    ProbeFailure {
        source_path: String,
        message: String,
    },

    /// External encoder reported a non-zero exit
    #[error("{program} exited with {status}: {stderr}")]
    ExecutorFailure {
        program: String,
        status: String,
        stderr: String,
    },

    /// Clip interval line could not be turned into a valid interval
    #[error("Malformed clip interval '{line}': {reason}")]
    MalformedInterval { line: String, reason: String },

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS[.ms], MM:SS[.ms], or seconds")]
    InvalidTimeFormat { time: String },

    /// Caller supplied an option combination or value outside its domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// External tool did not finish in time
    #[error("{program} timed out after {seconds}s")]
    Timeout { program: String, seconds: u64 },

    /// Configuration file or override could not be applied
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Probe JSON could not be decoded
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for vidprep operations
pub type VidprepResult<T> = std::result::Result<T, VidprepError>;
