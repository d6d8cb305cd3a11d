use super::phase::Phase;
use crate::completion::{ChatMessage, Role};
use crate::flow::FlowDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the agent knows about one conversation.
///
/// Sessions are plain values: the orchestrator takes one in and hands an
/// updated copy back, so distinct sessions can be processed concurrently
/// without any locking. Turns of the same session must be serialized by the
/// caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// User and assistant messages in conversation order.
    pub messages: Vec<ChatMessage>,
    /// Deduplicated requirement lines, in the order they were first stated.
    pub requirements: Vec<String>,
    pub phase: Phase,
    pub turn_count: u32,
    pub validation_retries: u32,
    /// The current candidate flow, not necessarily valid.
    pub flow: Option<Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to an empty conversation in `chat`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_flow(&self) -> bool {
        self.flow.is_some()
    }

    /// The candidate flow pretty-printed, as it would be handed to the engine.
    pub fn flow_json(&self) -> Option<String> {
        self.flow
            .as_ref()
            .and_then(|flow| serde_json::to_string_pretty(flow).ok())
    }

    /// Typed view of the candidate. Fails if the candidate is too malformed to map.
    pub fn flow_document(&self) -> Option<Result<FlowDocument, serde_json::Error>> {
        self.flow.clone().map(FlowDocument::from_value)
    }

    pub fn last_assistant_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    pub(crate) fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub(crate) fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }
}
