//! Current date and time.

use serde_json::Value;

use super::{Tool, ToolError, ToolSpec};

/// Returns the local date and time, e.g. `Sat Oct 18 14:23:45 2025 -07:00`.
pub struct TimeTool;

#[async_trait::async_trait]
impl Tool for TimeTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new("get_time", "Get the current date and time")
    }

    async fn execute(&self, _input: Value) -> Result<String, ToolError> {
        Ok(chrono::Local::now()
            .format("%a %b %e %H:%M:%S %Y %:z")
            .to_string())
    }
}
