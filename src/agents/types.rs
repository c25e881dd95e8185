use serde::{Deserialize, Serialize};

/// Board member roles
///
/// The set is fixed: four experts that each review an idea independently,
/// and the moderator that condenses their reports into a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Strategist,
    Financier,
    Auditor,
    Analyst,
    Moderator,
}

impl Role {
    /// Every role, experts first in calling order
    pub const ALL: [Role; 5] = [
        Role::Strategist,
        Role::Financier,
        Role::Auditor,
        Role::Analyst,
        Role::Moderator,
    ];

    /// Expert roles in the order the orchestrator consults them
    pub const EXPERTS: [Role; 4] = [
        Role::Strategist,
        Role::Financier,
        Role::Auditor,
        Role::Analyst,
    ];

    /// Stable key used in persisted records and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Strategist => "strategist",
            Role::Financier => "financier",
            Role::Auditor => "auditor",
            Role::Analyst => "analyst",
            Role::Moderator => "moderator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role's contribution to an analysis, as stored per column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub role: Role,
    pub content: String,
}

impl AgentReply {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// How the orchestrator schedules the four expert calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One expert at a time; the model backend is usually a single
    /// compute-constrained server.
    #[default]
    Sequential,
    /// All experts at once, for backends that can serve concurrent requests
    Parallel,
}
