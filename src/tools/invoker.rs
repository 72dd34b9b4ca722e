//! Tool invocation: argument validation, timeouts, and output capping.
//!
//! [`ToolInvoker::invoke`] returns typed [`ToolError`]s, while
//! [`ToolInvoker::resolve`] folds every outcome into a
//! [`Turn::ToolResult`](crate::transcript::Turn::ToolResult) so that tool
//! failures never abort an exchange.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use super::{ToolError, ToolRegistry, ToolSpec};
use crate::constants::TRUNCATION_MARKER;
use crate::transcript::Turn;

/// Executes registered tools on behalf of the orchestration loop.
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    max_output_chars: usize,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>, max_output_chars: usize) -> Self {
        Self {
            registry,
            max_output_chars,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs tool `name` with the raw JSON `arguments`, bounded by `timeout`.
    ///
    /// On timeout the handler future is dropped, which kills any child
    /// process it spawned.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: &str,
        timeout: Duration,
    ) -> Result<String, ToolError> {
        let (tool, spec) = match (self.registry.lookup(name), self.registry.spec(name)) {
            (Some(tool), Some(spec)) => (tool, spec),
            _ => return Err(ToolError::NotFound(name.to_string())),
        };
        let input = parse_arguments(arguments, spec)?;

        let started = Instant::now();
        let outcome = match tokio::time::timeout(timeout, tool.execute(input)).await {
            Ok(result) => result.map(|out| out.trim().to_string()),
            Err(_) => Err(ToolError::Timeout(timeout)),
        };
        tracing::info!(
            tool = name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "tool invocation finished"
        );
        outcome
    }

    /// Invokes the tool and converts the outcome into a result turn for
    /// `call_id`. Errors become `"Error: ..."` text; long output is capped.
    pub async fn resolve(
        &self,
        call_id: &str,
        name: &str,
        arguments: &str,
        timeout: Duration,
    ) -> Turn {
        let text = match self.invoke(name, arguments, timeout).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = name, call_id, error = %e, "tool invocation failed");
                format!("Error: {}", e)
            }
        };
        let (content, truncated) = truncate_output(&text, self.max_output_chars);
        if truncated {
            tracing::debug!(tool = name, call_id, "tool output truncated");
        }
        Turn::ToolResult {
            call_id: call_id.to_string(),
            content,
            truncated,
        }
    }
}

/// Parses a model-supplied argument payload and checks required keys.
///
/// An empty payload counts as `{}`. Undeclared keys are kept
/// and ignored by the handlers.
pub fn parse_arguments(arguments: &str, spec: &ToolSpec) -> Result<Value, ToolError> {
    let value = if arguments.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str::<Value>(arguments)
            .map_err(|e| ToolError::InvalidArguments(format!("malformed JSON: {}", e)))?
    };

    let object = value
        .as_object()
        .ok_or_else(|| ToolError::InvalidArguments("expected a JSON object".to_string()))?;

    if let Some(missing) = spec.required.iter().find(|key| !object.contains_key(*key)) {
        return Err(ToolError::InvalidArguments(format!(
            "missing required parameter '{}'",
            missing
        )));
    }
    Ok(value)
}

/// Cuts `text` to at most `max_chars` characters and appends
/// [`TRUNCATION_MARKER`]. Returns whether truncation happened.
pub fn truncate_output(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text.to_string(), false),
        Some((end, _)) => (format!("{}{}", &text[..end], TRUNCATION_MARKER), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ParamSpec;

    fn command_spec() -> ToolSpec {
        ToolSpec::new("bash", "run").param("command", ParamSpec::string("cmd"), true)
    }

    #[test]
    fn test_truncate_short_output_untouched() {
        let (out, truncated) = truncate_output("hello", 10);
        assert_eq!(out, "hello");
        assert!(!truncated);
    }

    #[test]
    fn test_truncate_exact_cap_untouched() {
        let text = "x".repeat(5000);
        let (out, truncated) = truncate_output(&text, 5000);
        assert_eq!(out.len(), 5000);
        assert!(!truncated);
    }

    #[test]
    fn test_truncate_long_output() {
        let text = "y".repeat(12_000);
        let (out, truncated) = truncate_output(&text, 5000);
        assert!(truncated);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert_eq!(out.matches(TRUNCATION_MARKER).count(), 1);
        assert_eq!(
            out.chars().count(),
            5000 + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let text = "é".repeat(20);
        let (out, truncated) = truncate_output(&text, 10);
        assert!(truncated);
        assert!(out.starts_with(&"é".repeat(10)));
        assert!(!out.starts_with(&"é".repeat(11)));
    }

    #[test]
    fn test_parse_arguments_accepts_object() {
        let value = parse_arguments(r#"{"command":"ls","extra":1}"#, &command_spec()).unwrap();
        assert_eq!(value["command"], "ls");
    }

    #[test]
    fn test_parse_arguments_empty_payload_is_empty_object() {
        let spec = ToolSpec::new("get_time", "time");
        let value = parse_arguments("", &spec).unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parse_arguments_missing_required() {
        let err = parse_arguments("{}", &command_spec()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m.contains("command")));
    }

    #[test]
    fn test_parse_arguments_malformed_json() {
        let err = parse_arguments("{not json", &command_spec()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_parse_arguments_rejects_non_object() {
        let err = parse_arguments("[1,2]", &command_spec()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(ref m) if m.contains("object")));
    }
}
