// Ports - Interface definitions for the external prober and encoder

use std::path::Path;

use async_trait::async_trait;

use crate::domain::model::{EncodeInvocation, ProbedMedia};
use crate::error::VidprepResult;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe a source and return its container and stream description
    async fn probe(&self, source: &Path) -> VidprepResult<ProbedMedia>;
}

/// Captured result of a successful encoder run
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Port for running the external encoder
#[async_trait]
pub trait ExecutePort: Send + Sync {
    /// Run one invocation. A non-zero exit is reported as
    /// [`crate::error::VidprepError::ExecutorFailure`].
    async fn execute(&self, invocation: &EncodeInvocation) -> VidprepResult<ExecOutput>;
}
