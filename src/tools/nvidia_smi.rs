//! GPU diagnostics tool backed by `nvidia-smi`.

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use super::{parse_input, shell, ParamSpec, Tool, ToolError, ToolSpec};

/// Runs `nvidia-smi` invocations. Same contract as the bash tool, but the
/// command must start with `nvidia-smi`.
pub struct NvidiaSmiTool {
    workdir: PathBuf,
}

impl NvidiaSmiTool {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

#[derive(Deserialize)]
struct NvidiaSmiInput {
    command: String,
}

fn is_nvidia_smi(command: &str) -> bool {
    command
        .split_whitespace()
        .next()
        .map(|program| program == "nvidia-smi" || program.ends_with("/nvidia-smi"))
        .unwrap_or(false)
}

#[async_trait::async_trait]
impl Tool for NvidiaSmiTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "nvidia_smi",
            "Execute the nvidia-smi command on shell and return the output.",
        )
        .param(
            "command",
            ParamSpec::string(
                "The nvidia-smi command to execute (e.g., 'nvidia-smi', 'nvidia-smi -q'). \
Use flags to limit output for commands that run continuously.",
            ),
            true,
        )
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let input: NvidiaSmiInput = parse_input(input)?;
        if !is_nvidia_smi(&input.command) {
            return Err(ToolError::InvalidArguments(format!(
                "expected an nvidia-smi command, got '{}'",
                input.command
            )));
        }
        shell::run_command(&input.command, &self.workdir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nvidia_smi() {
        assert!(is_nvidia_smi("nvidia-smi"));
        assert!(is_nvidia_smi("  nvidia-smi -q -d MEMORY"));
        assert!(is_nvidia_smi("/usr/bin/nvidia-smi -L"));
        assert!(!is_nvidia_smi("rm -rf /tmp/x; nvidia-smi"));
        assert!(!is_nvidia_smi(""));
    }
}
