use std::sync::Arc;

use super::errors::AgentResult;
use super::llm::LlmTransport;
use super::types::Role;

/// A board member bound to one model and persona
///
/// Built once at startup and shared read-only by every analysis.
#[derive(Clone)]
pub struct Agent {
    role: Role,
    model: String,
    system_prompt: String,
    transport: Arc<dyn LlmTransport>,
}

impl Agent {
    pub fn new(
        role: Role,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        transport: Arc<dyn LlmTransport>,
    ) -> Self {
        Self {
            role,
            model: model.into(),
            system_prompt: system_prompt.into(),
            transport,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Ask this agent about `prompt`. Transport errors are returned as-is.
    pub async fn run(&self, prompt: &str) -> AgentResult<String> {
        self.transport
            .chat(&self.model, &self.system_prompt, prompt)
            .await
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::errors::AgentError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and echoes the inputs back
    #[derive(Default)]
    struct EchoTransport {
        calls: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl LlmTransport for EchoTransport {
        async fn chat(&self, model: &str, system: &str, user: &str) -> AgentResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((model.to_string(), system.to_string(), user.to_string()));
            Ok(format!("{model}:{user}"))
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl LlmTransport for FailingTransport {
        async fn chat(&self, _: &str, _: &str, _: &str) -> AgentResult<String> {
            Err(AgentError::EmptyChoices)
        }
    }

    #[tokio::test]
    async fn run_sends_model_persona_and_prompt() {
        let transport = Arc::new(EchoTransport::default());
        let agent = Agent::new(Role::Auditor, "mistral:7b", "be skeptical", transport.clone());

        let reply = agent.run("coffee subscription app").await.unwrap();

        assert_eq!(reply, "mistral:7b:coffee subscription app");
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "be skeptical");
    }

    #[tokio::test]
    async fn run_returns_transport_error_unmodified() {
        let agent = Agent::new(Role::Analyst, "qwen2.5:7b", "", Arc::new(FailingTransport));

        let err = agent.run("idea").await.unwrap_err();

        assert!(matches!(err, AgentError::EmptyChoices));
    }
}
