//! Shell adapter: runs external programs with `std::process`.

use std::path::Path;
use std::process::{Command, Stdio};

use sprout_core::{
    application::ports::{ShellCommand, ShellRunner},
    error::{SproutError, SproutResult},
};
use tracing::{debug, instrument};

/// Runs commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl SystemShell {
    pub fn new() -> Self {
        Self
    }
}

impl ShellRunner for SystemShell {
    #[instrument(skip(self), fields(command = %command))]
    fn run(&self, command: &ShellCommand, cwd: &Path) -> SproutResult<String> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SproutError::ShellCommand {
                command: command.to_string(),
                output: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            debug!(status = %output.status, "command finished");
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        Err(SproutError::ShellCommand {
            command: command.to_string(),
            output: format!("{} ({})", detail, output.status),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }
}
