//! Model gateway port.
//!
//! The orchestration loop talks to the model only through [`ModelGateway`].
//! Implementations are stateless between calls: the full transcript and the
//! tool list are resupplied every time.

use anyhow::Result;
use async_trait::async_trait;

use crate::tools::ToolSpec;
use crate::transcript::Transcript;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    /// Provider-assigned id used to match the result.
    pub call_id: String,
    pub name: String,
    /// JSON arguments, as a raw string.
    pub arguments: String,
}

impl ToolRequest {
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// What the model produced for one call. Either field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayResponse {
    pub content: String,
    pub tool_requests: Vec<ToolRequest>,
}

impl GatewayResponse {
    /// Neither text nor tool requests.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.tool_requests.is_empty()
    }
}

#[cfg(test)]
impl GatewayResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_requests: Vec::new(),
        }
    }

    pub fn tools(tool_requests: Vec<ToolRequest>) -> Self {
        Self {
            content: String::new(),
            tool_requests,
        }
    }
}

/// Sends a transcript to a language model.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends `transcript`, the advertised `tools` and the `system` instruction.
    ///
    /// Errors are transport failures (unreachable provider, HTTP errors,
    /// rejected requests).
    async fn complete(
        &self,
        transcript: &Transcript,
        tools: &[ToolSpec],
        system: &str,
    ) -> Result<GatewayResponse>;
}
