use std::collections::HashMap;
use std::time::Duration;

use super::errors::{AgentError, AgentResult};
use super::prompts::{expert_placeholder, library, limit_text, EXPERT_BRIEF_CHARS};
use super::registry::AgentRegistry;
use super::types::{ExecutionMode, Role};
use crate::domain::analysis::Analysis;

/// Upper bound on one full board run
pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Orchestrator configuration
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    pub timeout: Duration,
    pub mode: ExecutionMode,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_ANALYSIS_TIMEOUT,
            mode: ExecutionMode::Sequential,
        }
    }
}

/// Reports of the four experts, in calling order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpertReports {
    pub strategist: String,
    pub financier: String,
    pub auditor: String,
    pub analyst: String,
}

impl ExpertReports {
    fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        [
            (Role::Strategist, self.strategist.as_str()),
            (Role::Financier, self.financier.as_str()),
            (Role::Auditor, self.auditor.as_str()),
            (Role::Analyst, self.analyst.as_str()),
        ]
        .into_iter()
    }
}

/// Runs the board: experts first, then the moderator over their condensed
/// reports
pub struct Orchestrator {
    registry: AgentRegistry,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(registry: AgentRegistry, config: OrchestratorConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Analyze `idea` for `user_id`
    ///
    /// Expert failures degrade to placeholders. Only a missing or failing
    /// moderator (or the overall deadline) fails the analysis.
    pub async fn run_analysis(&self, idea: &str, user_id: i64) -> AgentResult<Analysis> {
        if self.registry.is_empty() {
            return Err(AgentError::ConfigError(
                "agents not initialized".to_string(),
            ));
        }
        if self.registry.get(Role::Moderator).is_none() {
            return Err(AgentError::AgentNotFound(Role::Moderator.to_string()));
        }

        let deadline = self.config.timeout;
        tokio::time::timeout(deadline, self.run_board(idea, user_id))
            .await
            .map_err(|_| AgentError::Timeout(deadline))?
    }

    async fn run_board(&self, idea: &str, user_id: i64) -> AgentResult<Analysis> {
        let reports = self.consult_experts(idea).await;
        let prompt = moderator_prompt(idea, &reports);

        let moderator = self
            .registry
            .get(Role::Moderator)
            .ok_or_else(|| AgentError::AgentNotFound(Role::Moderator.to_string()))?;

        tracing::debug!(user_id, prompt_chars = prompt.chars().count(), "Running moderator");
        let verdict = moderator
            .run(&prompt)
            .await
            .map_err(|e| AgentError::ModeratorFailed(Box::new(e)))?;

        let mut analysis = Analysis::new(user_id, idea);
        for (role, text) in reports.iter() {
            analysis.set_text(role, text);
        }
        analysis.set_text(Role::Moderator, verdict);

        Ok(analysis)
    }

    async fn consult_experts(&self, idea: &str) -> ExpertReports {
        match self.config.mode {
            ExecutionMode::Sequential => {
                let strategist = self.consult(Role::Strategist, idea).await;
                let financier = self.consult(Role::Financier, idea).await;
                let auditor = self.consult(Role::Auditor, idea).await;
                let analyst = self.consult(Role::Analyst, idea).await;
                ExpertReports {
                    strategist,
                    financier,
                    auditor,
                    analyst,
                }
            }
            ExecutionMode::Parallel => {
                let (strategist, financier, auditor, analyst) = tokio::join!(
                    self.consult(Role::Strategist, idea),
                    self.consult(Role::Financier, idea),
                    self.consult(Role::Auditor, idea),
                    self.consult(Role::Analyst, idea),
                );
                ExpertReports {
                    strategist,
                    financier,
                    auditor,
                    analyst,
                }
            }
        }
    }

    /// One expert's report, or its placeholder if the expert is missing or
    /// its call fails
    async fn consult(&self, role: Role, idea: &str) -> String {
        let Some(agent) = self.registry.get(role) else {
            tracing::warn!(role = %role, "Expert agent not registered");
            return expert_placeholder(role).to_string();
        };

        match agent.run(idea).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(role = %role, model = agent.model(), error = %e, "Expert agent failed");
                expert_placeholder(role).to_string()
            }
        }
    }
}

/// Brief for the moderator: the idea plus each expert report cut to
/// [`EXPERT_BRIEF_CHARS`]
pub fn moderator_prompt(idea: &str, reports: &ExpertReports) -> String {
    let mut vars: HashMap<String, String> = reports
        .iter()
        .map(|(role, text)| (role.as_str().to_string(), limit_text(text, EXPERT_BRIEF_CHARS)))
        .collect();
    vars.insert("idea".to_string(), idea.to_string());

    library::moderator_brief().render(&vars)
}
