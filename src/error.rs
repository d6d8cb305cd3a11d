use crate::agent::Phase;
use thiserror::Error;

/// Errors raised by a text-completion backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion service returned no message")]
    EmptyResponse,

    #[error("Environment variable '{0}' is not set")]
    MissingApiKey(String),

    #[error("Scripted completion has no responses left")]
    Exhausted,
}

/// Turn-level failure. The session passed to the orchestrator is left untouched.
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("Completion failed while in phase '{phase}': {source}")]
    Completion {
        phase: Phase,
        #[source]
        source: CompletionError,
    },
}

/// Errors that can occur while reading agent configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}
