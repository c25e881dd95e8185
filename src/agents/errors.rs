use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the agent system
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM API error: {0}")]
    LlmError(String),

    #[error("LLM HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Empty choices in LLM response")]
    EmptyChoices,

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Moderator run failed: {0}")]
    ModeratorFailed(Box<AgentError>),

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::LlmError(err.to_string())
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
