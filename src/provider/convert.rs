//! Translation between kilo transcripts and rig-core messages.
//!
//! Tool requests become tool-call items on an assistant message and tool
//! results become tool-result items on a user message. Consecutive turns that
//! map to the same role are merged so the outgoing history alternates roles.

use rig::completion::ToolDefinition;
use rig::message::{
    AssistantContent, Message as RigMessage, Text, ToolCall as RigToolCall, ToolFunction,
    ToolResultContent, UserContent,
};
use rig::OneOrMany;
use serde_json::Value;

use crate::gateway::{GatewayResponse, ToolRequest};
use crate::tools::ToolSpec;
use crate::transcript::{Transcript, Turn};

enum Item {
    User(UserContent),
    Assistant(AssistantContent),
}

fn to_item(turn: &Turn) -> Item {
    match turn {
        Turn::User { content } => Item::User(UserContent::text(content.clone())),
        Turn::Assistant { content } => Item::Assistant(AssistantContent::text(content.clone())),
        Turn::ToolRequest {
            call_id,
            tool_name,
            arguments,
        } => Item::Assistant(AssistantContent::ToolCall(RigToolCall::new(
            call_id.clone(),
            ToolFunction::new(tool_name.clone(), parse_arguments(arguments)),
        ))),
        Turn::ToolResult {
            call_id, content, ..
        } => Item::User(UserContent::tool_result(
            call_id.clone(),
            OneOrMany::one(ToolResultContent::text(content.clone())),
        )),
    }
}

/// Arguments that are not valid JSON are sent as an empty object; the
/// matching tool result already carries the parse error.
fn parse_arguments(arguments: &str) -> Value {
    serde_json::from_str(arguments).unwrap_or_else(|_| Value::Object(Default::default()))
}

/// Converts a transcript into rig messages, merging same-role neighbours.
pub(super) fn to_rig_messages(transcript: &Transcript) -> Vec<RigMessage> {
    let mut messages = Vec::new();
    let mut user: Vec<UserContent> = Vec::new();
    let mut assistant: Vec<AssistantContent> = Vec::new();

    for turn in transcript.turns() {
        match to_item(turn) {
            Item::User(content) => {
                flush_assistant(&mut assistant, &mut messages);
                user.push(content);
            }
            Item::Assistant(content) => {
                flush_user(&mut user, &mut messages);
                assistant.push(content);
            }
        }
    }
    flush_user(&mut user, &mut messages);
    flush_assistant(&mut assistant, &mut messages);
    messages
}

fn flush_user(items: &mut Vec<UserContent>, out: &mut Vec<RigMessage>) {
    if let Ok(content) = OneOrMany::many(std::mem::take(items)) {
        out.push(RigMessage::User { content });
    }
}

fn flush_assistant(items: &mut Vec<AssistantContent>, out: &mut Vec<RigMessage>) {
    if let Ok(content) = OneOrMany::many(std::mem::take(items)) {
        out.push(RigMessage::Assistant { id: None, content });
    }
}

/// Advertised tool definitions for a completion request.
pub(super) fn to_tool_definitions(tools: &[ToolSpec]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|spec| ToolDefinition {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: spec.input_schema(),
        })
        .collect()
}

/// Collects text and tool calls from a completion choice.
///
/// Multiple text items are joined with newlines. Reasoning and other content
/// kinds are ignored.
pub(super) fn from_choice(choice: OneOrMany<AssistantContent>) -> GatewayResponse {
    let mut texts: Vec<String> = Vec::new();
    let mut tool_requests = Vec::new();

    for item in choice {
        match item {
            AssistantContent::Text(Text { text }) => {
                if !text.trim().is_empty() {
                    texts.push(text);
                }
            }
            AssistantContent::ToolCall(call) => {
                tool_requests.push(ToolRequest::new(
                    call.id,
                    call.function.name,
                    call.function.arguments.to_string(),
                ));
            }
            _ => {}
        }
    }

    GatewayResponse {
        content: texts.join("\n"),
        tool_requests,
    }
}
