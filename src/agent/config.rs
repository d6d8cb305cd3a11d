use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_MAX_VALIDATION_RETRIES: u32 = 2;
pub const DEFAULT_GATHERING_TURN_LIMIT: u32 = 6;
pub const DEFAULT_REQUIREMENT_MAX_LEN: usize = 200;

/// How eagerly the agent moves from conversation to generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Generate as soon as a reply signals bot intent.
    #[default]
    Immediate,
    /// Ask clarifying questions first; generate once the model produces a
    /// flow on its own or the gathering turn limit is passed.
    Clarifying,
}

impl FromStr for GenerationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(GenerationMode::Immediate),
            "clarifying" => Ok(GenerationMode::Clarifying),
            other => Err(ConfigError::InvalidValue {
                key: "mode".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Tunables for the [`Orchestrator`](super::Orchestrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Repair attempts allowed before a defective flow is accepted as-is.
    pub max_validation_retries: u32,
    pub mode: GenerationMode,
    /// Clarifying mode only: generation is forced once `turn_count` exceeds this.
    pub gathering_turn_limit: u32,
    /// Bullet lines at least this long are treated as noise, not requirements.
    pub requirement_max_len: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_validation_retries: DEFAULT_MAX_VALIDATION_RETRIES,
            mode: GenerationMode::Immediate,
            gathering_turn_limit: DEFAULT_GATHERING_TURN_LIMIT,
            requirement_max_len: DEFAULT_REQUIREMENT_MAX_LEN,
        }
    }
}

impl AgentConfig {
    /// Defaults overridden by `BOTFLOW_MAX_RETRIES` and `BOTFLOW_MODE` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup("BOTFLOW_MAX_RETRIES") {
            config.max_validation_retries =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "BOTFLOW_MAX_RETRIES".to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup("BOTFLOW_MODE") {
            config.mode = raw.parse()?;
        }
        Ok(config)
    }

    pub fn with_max_validation_retries(mut self, retries: u32) -> Self {
        self.max_validation_retries = retries;
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_gathering_turn_limit(mut self, limit: u32) -> Self {
        self.gathering_turn_limit = limit;
        self
    }

    pub fn with_requirement_max_len(mut self, max_len: usize) -> Self {
        self.requirement_max_len = max_len;
        self
    }
}
