use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agents::types::{AgentReply, Role};

/// Board report for one idea
///
/// Produced by the orchestrator without `id` or `created_at`; both are
/// assigned by storage when the analysis is saved.
///
/// # Example
/// ```
/// use board_ai::agents::types::Role;
/// use board_ai::domain::analysis::Analysis;
///
/// let mut analysis = Analysis::new(42, "coffee subscription app");
/// analysis.set_text(Role::Moderator, "launch");
///
/// assert_eq!(analysis.text(Role::Moderator), "launch");
/// assert!(!analysis.is_persisted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Option<i64>,
    pub user_id: i64,
    pub idea_text: String,
    pub strategist: String,
    pub financier: String,
    pub auditor: String,
    pub analyst: String,
    pub moderator: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Analysis {
    /// Start an analysis with empty reports
    pub fn new(user_id: i64, idea_text: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            idea_text: idea_text.into(),
            strategist: String::new(),
            financier: String::new(),
            auditor: String::new(),
            analyst: String::new(),
            moderator: String::new(),
            created_at: None,
        }
    }

    /// The report written by `role`
    pub fn text(&self, role: Role) -> &str {
        match role {
            Role::Strategist => &self.strategist,
            Role::Financier => &self.financier,
            Role::Auditor => &self.auditor,
            Role::Analyst => &self.analyst,
            Role::Moderator => &self.moderator,
        }
    }

    pub fn set_text(&mut self, role: Role, text: impl Into<String>) {
        let slot = match role {
            Role::Strategist => &mut self.strategist,
            Role::Financier => &mut self.financier,
            Role::Auditor => &mut self.auditor,
            Role::Analyst => &mut self.analyst,
            Role::Moderator => &mut self.moderator,
        };
        *slot = text.into();
    }

    /// The report written by `role` as a storable unit
    pub fn reply(&self, role: Role) -> AgentReply {
        AgentReply::new(role, self.text(role))
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Record the identity storage assigned to this analysis
    pub fn mark_persisted(&mut self, id: i64, created_at: DateTime<Utc>) {
        self.id = Some(id);
        self.created_at = Some(created_at);
    }
}
