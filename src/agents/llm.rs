use async_trait::async_trait;

use super::errors::AgentResult;

/// Sampling temperature used for every board member
pub const TEMPERATURE: f32 = 0.1;

/// Reply length cap per call
pub const MAX_TOKENS: u32 = 500;

/// Chat-completion transport shared by all agents
///
/// Implementations send a two-message exchange (system + user) to `model`
/// and return the first choice's content.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    async fn chat(&self, model: &str, system_prompt: &str, user_prompt: &str)
        -> AgentResult<String>;
}
