//! Conversation transcript for kilo.
//!
//! A [`Transcript`] is the ordered, append-only list of [`Turn`]s that is
//! resent to the model on every gateway call. The model is stateless, so the
//! order of turns is significant and is never rewritten.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One unit of transcript content.
///
/// Tool-call fields only exist on the variants that carry them, so a user
/// turn with a call id cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Turn {
    /// User-authored input.
    User { content: String },
    /// Model-authored natural-language content.
    Assistant { content: String },
    /// A model request to invoke a tool.
    ToolRequest {
        /// Opaque, provider-assigned id. Unique within a transcript.
        call_id: String,
        tool_name: String,
        /// Raw JSON argument payload as produced by the model.
        arguments: String,
    },
    /// Output (or failure text) of a tool invocation.
    ToolResult {
        /// Id of the [`Turn::ToolRequest`] this result answers.
        call_id: String,
        content: String,
        /// Whether `content` was cut at the output cap.
        truncated: bool,
    },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User {
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Turn::Assistant {
            content: text.into(),
        }
    }

    /// Returns the text body of the turn (arguments for tool requests).
    pub fn text(&self) -> &str {
        match self {
            Turn::User { content } | Turn::Assistant { content } => content,
            Turn::ToolRequest { arguments, .. } => arguments,
            Turn::ToolResult { content, .. } => content,
        }
    }
}

/// Transcript invariant violations.
///
/// These indicate a broken contract between the gateway and the loop rather
/// than a connectivity fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("tool result '{call_id}' has no matching tool request")]
    OrphanResult { call_id: String },
    #[error("tool call id '{call_id}' was issued more than once")]
    DuplicateCallId { call_id: String },
}

/// Ordered, append-only sequence of [`Turn`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Turn::user(text));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether a tool request with this id already exists.
    pub fn has_call_id(&self, id: &str) -> bool {
        self.turns
            .iter()
            .any(|t| matches!(t, Turn::ToolRequest { call_id, .. } if call_id == id))
    }

    /// Checks the call-id invariants: request ids are unique and every
    /// result answers an earlier request.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let mut requested: HashSet<&str> = HashSet::new();
        for turn in &self.turns {
            match turn {
                Turn::ToolRequest { call_id, .. } => {
                    if !requested.insert(call_id.as_str()) {
                        return Err(ProtocolError::DuplicateCallId {
                            call_id: call_id.clone(),
                        });
                    }
                }
                Turn::ToolResult { call_id, .. } => {
                    if !requested.contains(call_id.as_str()) {
                        return Err(ProtocolError::OrphanResult {
                            call_id: call_id.clone(),
                        });
                    }
                }
                Turn::User { .. } | Turn::Assistant { .. } => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str) -> Turn {
        Turn::ToolRequest {
            call_id: id.into(),
            tool_name: "bash".into(),
            arguments: "{}".into(),
        }
    }

    fn result(id: &str) -> Turn {
        Turn::ToolResult {
            call_id: id.into(),
            content: "ok".into(),
            truncated: false,
        }
    }

    #[test]
    fn test_validate_accepts_matched_results() {
        let mut t = Transcript::new();
        t.push_user("hi");
        t.push(request("a"));
        t.push(request("b"));
        t.push(result("a"));
        t.push(result("b"));
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_orphan_result() {
        let mut t = Transcript::new();
        t.push_user("hi");
        t.push(result("ghost"));
        assert_eq!(
            t.validate(),
            Err(ProtocolError::OrphanResult {
                call_id: "ghost".into()
            })
        );
    }

    #[test]
    fn test_validate_rejects_result_before_request() {
        let mut t = Transcript::new();
        t.push(result("a"));
        t.push(request("a"));
        assert!(matches!(
            t.validate(),
            Err(ProtocolError::OrphanResult { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut t = Transcript::new();
        t.push(request("a"));
        t.push(result("a"));
        t.push(request("a"));
        assert!(matches!(
            t.validate(),
            Err(ProtocolError::DuplicateCallId { .. })
        ));
    }

    #[test]
    fn test_turn_serializes_with_kind_tag() {
        let json = serde_json::to_value(Turn::user("hello")).unwrap();
        assert_eq!(json["kind"], "user");
        assert_eq!(json["content"], "hello");
        assert!(json.get("call_id").is_none());
    }
}
