//! Bash tool: arbitrary shell command execution.

use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

use super::{parse_input, shell, ParamSpec, Tool, ToolError, ToolSpec};

/// Tool that executes shell commands in a child process.
///
/// Commands run in the working directory with sensitive environment
/// variables stripped. The invoker bounds each run with a timeout.
pub struct BashTool {
    workdir: PathBuf,
}

impl BashTool {
    /// Create a new `BashTool` that runs commands in `workdir`.
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }
}

#[derive(Deserialize)]
struct BashInput {
    command: String,
}

#[async_trait::async_trait]
impl Tool for BashTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            "bash",
            "Execute a bash command and return the output. Use this to run shell commands, \
check system information, or interact with the filesystem. For commands like 'top', \
use 'top -b -n 1' to get a single snapshot instead of continuous output.",
        )
        .param(
            "command",
            ParamSpec::string(
                "The bash command to execute (e.g., 'ls -la', 'date', 'pwd'). \
Use flags to limit output for commands that run continuously.",
            ),
            true,
        )
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let input: BashInput = parse_input(input)?;
        shell::run_command(&input.command, &self.workdir).await
    }
}
