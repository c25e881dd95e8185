use serde::{Deserialize, Serialize};

/// Conversation mode of one user
///
/// # Transitions (driven by the request handler)
/// ```text
/// Idle -> WaitingForIdea -> Processing -> HasLastResult
///   ^                           |               |
///   +------- failure / cancel --+---------------+
/// ```
/// "New analysis" moves any state to `WaitingForIdea`; cancel moves any
/// state to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No conversation in progress
    #[default]
    Idle,
    /// Asked for an idea, waiting for the user's text
    WaitingForIdea,
    /// An analysis is running in the background
    Processing,
    /// The last analysis finished and can be saved
    HasLastResult,
}

impl SessionState {
    /// Whether a submitted idea should start a new analysis
    pub fn accepts_idea(&self) -> bool {
        matches!(self, SessionState::WaitingForIdea)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::WaitingForIdea => write!(f, "waiting_for_idea"),
            SessionState::Processing => write!(f, "processing"),
            SessionState::HasLastResult => write!(f, "has_last_result"),
        }
    }
}
