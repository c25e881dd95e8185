// Agent system modules
//
// Role-bound LLM agents and the orchestrator that runs them as a board
// reviewing one business idea.

pub mod agent;
pub mod errors;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod registry;
pub mod types;

// Re-export main types
pub use agent::Agent;
pub use errors::{AgentError, AgentResult};
pub use llm::LlmTransport;
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use registry::AgentRegistry;
pub use types::{AgentReply, ExecutionMode, Role};
