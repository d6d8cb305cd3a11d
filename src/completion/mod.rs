//! The boundary to the external text-completion service.
//!
//! The orchestrator only ever sees [`CompletionService::complete`]: a list of
//! role-tagged messages in, one block of free text out. Transport, timeouts
//! and retries of the underlying call belong to the implementation.

use crate::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAiCompletion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A blocking text-completion backend.
pub trait CompletionService {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

impl<F> CompletionService for F
where
    F: Fn(&[ChatMessage]) -> Result<String, CompletionError>,
{
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self(messages)
    }
}

/// Replays canned responses in order and records every prompt it was sent.
///
/// Useful for tests and offline demos. Once the script runs out, every call
/// fails with [`CompletionError::Exhausted`].
#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues a failure to be returned by the next unanswered call.
    pub fn push_error(&self, error: CompletionError) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(error));
        }
    }

    pub fn push_response(&self, response: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(response.into()));
        }
    }

    /// Every prompt received so far, oldest first.
    pub fn prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl CompletionService for ScriptedCompletion {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(messages.to_vec());
        }
        self.responses
            .lock()
            .map_err(|_| CompletionError::Exhausted)?
            .pop_front()
            .unwrap_or(Err(CompletionError::Exhausted))
    }
}
