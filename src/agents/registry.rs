use std::collections::HashMap;
use std::sync::Arc;

use super::agent::Agent;
use super::llm::LlmTransport;
use super::prompts::library;
use super::types::Role;
use crate::config::ModelConfig;

/// Role-keyed set of board members
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: HashMap<Role, Agent>,
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every role to its configured model, all sharing one transport
    pub fn from_config(transport: Arc<dyn LlmTransport>, models: &ModelConfig) -> Self {
        let mut registry = Self::new();
        for role in Role::ALL {
            registry.insert(Agent::new(
                role,
                models.model_for(role),
                library::system_prompt(role),
                transport.clone(),
            ));
        }
        registry
    }

    /// Add or replace the agent for its role
    pub fn insert(&mut self, agent: Agent) {
        self.agents.insert(agent.role(), agent);
    }

    pub fn get(&self, role: Role) -> Option<&Agent> {
        self.agents.get(&role)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
