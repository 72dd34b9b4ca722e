pub mod bash_tool;
pub mod invoker;
pub mod nvidia_smi;
mod shell;
pub mod time_tool;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use bash_tool::BashTool;
use nvidia_smi::NvidiaSmiTool;
use time_tool::TimeTool;

pub use invoker::ToolInvoker;

/// Type and description of one tool parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl ParamSpec {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            kind: "string".to_string(),
            description: description.into(),
        }
    }
}

/// Declaration sent to the model so it knows what a tool does and accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParamSpec>,
    pub required: Vec<String>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Adds a parameter. `required` parameters keep their declaration order.
    pub fn param(mut self, name: &str, spec: ParamSpec, required: bool) -> Self {
        self.parameters.insert(name.to_string(), spec);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    /// JSON Schema object describing the tool's input.
    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": self.parameters,
            "required": self.required,
        })
    }
}

/// Failures of a single tool invocation.
///
/// None of these end an exchange: the loop turns them into result text the
/// model can read and react to.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("timed out after {}", format_duration(*.0))]
    Timeout(Duration),
    #[error("command failed: {exit_info}\nOutput: {output}")]
    ExecutionFailed { exit_info: String, output: String },
}

/// Whole seconds as `30s`, anything finer as `250ms`.
pub(crate) fn format_duration(d: Duration) -> String {
    if d.subsec_millis() == 0 && d.as_secs() > 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}

/// Deserializes validated tool arguments into a tool's input struct.
pub(crate) fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Declaration advertised to the model. Read once, at registration.
    fn spec(&self) -> ToolSpec;

    /// Execute the tool with a JSON object whose required keys are present.
    async fn execute(&self, input: Value) -> Result<String, ToolError>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    Duplicate(String),
}

/// Holds all registered tools and dispatches calls by name.
///
/// Specs are kept in registration order so the tool list sent to the model
/// is stable between calls.
#[derive(Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
    handlers: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Called during startup.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let spec = tool.spec();
        if self.handlers.contains_key(&spec.name) {
            return Err(RegistryError::Duplicate(spec.name));
        }
        self.handlers.insert(spec.name.clone(), Arc::from(tool));
        self.specs.push(spec);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.handlers.get(name).cloned()
    }

    pub fn spec(&self, name: &str) -> Option<&ToolSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Specs of every registered tool, in registration order.
    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl ToolRegistry {
    /// Create a registry with all built-in tools.
    pub fn with_builtins(workdir: PathBuf) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(Box::new(BashTool::new(workdir.clone())))?;
        registry.register(Box::new(NvidiaSmiTool::new(workdir)))?;
        registry.register(Box::new(TimeTool))?;
        Ok(registry)
    }
}
