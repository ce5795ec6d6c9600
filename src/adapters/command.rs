//! Running external tools with a deadline

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{VidprepError, VidprepResult};

/// Spawn `program` with `args`, capture its output and kill it if it outlives
/// `timeout`. The exit status is left for the caller to judge.
pub async fn run_tool(program: &Path, args: &[String], timeout: Duration) -> VidprepResult<Output> {
    let name = program_name(program);
    debug!(program = %name, ?args, "Spawning tool");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn()?;
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => Ok(output?),
        Err(_) => Err(VidprepError::Timeout {
            program: name,
            seconds: timeout.as_secs(),
        }),
    }
}

/// File name of the program, for messages
pub fn program_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string())
}
