//! External tool execution
//!
//! The converters are single-shot, non-interactive programs. A
//! [`ToolRunner`] runs one to completion and reports success only for a
//! zero exit status, which lets the pipeline be exercised without the real
//! binaries.

use std::process::Stdio;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::platform::Invocation;

/// Captured output of a finished tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs an external tool to completion
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Execute `invocation` and wait for it to exit
    ///
    /// # Errors
    /// `ExternalToolFailure` if the tool cannot be started or exits non-zero
    async fn run(&self, tool: &str, invocation: &Invocation) -> Result<ToolOutput>;
}

/// Runs tools as child processes with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToolRunner;

#[async_trait]
impl ToolRunner for ProcessToolRunner {
    async fn run(&self, tool: &str, invocation: &Invocation) -> Result<ToolOutput> {
        info!("Running {}: {}", tool, invocation);

        let mut command = invocation.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = command.output().await.map_err(|e| {
            error!("Failed to start {} ('{}'): {}", tool, invocation, e);
            Error::ExternalToolFailure {
                tool: tool.to_string(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            }
        })?;

        let captured = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("{} stdout:\n{}", tool, captured.stdout);

        if !output.status.success() {
            error!(
                "{} failed ({}): '{}'\n{}",
                tool, output.status, invocation, captured.stderr
            );
            return Err(Error::tool_failed(tool, output.status, &output.stderr));
        }

        Ok(captured)
    }
}
