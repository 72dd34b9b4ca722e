//! Shared command runner for the shell-backed tools.

use std::path::Path;
use std::process::Stdio;

use super::ToolError;
use crate::constants::SHELL_STRIPPED_ENV_VARS;

/// Runs `command` through `bash -c` in `workdir` and returns the combined
/// stdout and stderr, trimmed.
///
/// The child is killed when the returned future is dropped, which is how an
/// invoker timeout cancels a running command.
pub(super) async fn run_command(command: &str, workdir: &Path) -> Result<String, ToolError> {
    let mut cmd = tokio::process::Command::new("bash");
    cmd.arg("-c").arg(command);
    cmd.current_dir(workdir);
    cmd.kill_on_drop(true);

    // Strip sensitive environment variables.
    for var in SHELL_STRIPPED_ENV_VARS {
        cmd.env_remove(var);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().await.map_err(|e| ToolError::ExecutionFailed {
        exit_info: format!("failed to start command: {}", e),
        output: String::new(),
    })?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    let text = text.trim().to_string();

    if output.status.success() {
        return Ok(text);
    }

    let exit_info = match output.status.code() {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    };
    Err(ToolError::ExecutionFailed {
        exit_info,
        output: text,
    })
}
