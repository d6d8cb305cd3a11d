use super::{ChatMessage, CompletionService};
use crate::error::CompletionError;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat-completions client for OpenAI-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

impl OpenAiCompletion {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CompletionError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, CompletionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            client,
        })
    }

    /// Reads `OPENAI_API_KEY`, and optionally `BOTMOTHER_MODEL` and `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| CompletionError::MissingApiKey("OPENAI_API_KEY".to_string()))?;
        let mut client = Self::new(api_key)?;
        if let Ok(model) = std::env::var("BOTMOTHER_MODEL") {
            client.model = model;
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            client = client.with_base_url(&base_url);
        }
        Ok(client)
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionService for OpenAiCompletion {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": &self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        log::debug!(
            "Requesting completion from '{}' with {} messages",
            self.model,
            messages.len()
        );
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}
