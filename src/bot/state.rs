// Per-user session state storage
//
// Any state may be written at any time; transition rules live in the
// request handler.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::session::SessionState;

/// Key-value store of session states
pub trait SessionStore: Send + Sync {
    /// State of `user_id`, `Idle` if never set
    fn get(&self, user_id: i64) -> SessionState;

    fn set(&self, user_id: i64, state: SessionState);

    /// Move `user_id` from `from` to `to` atomically. Returns false and
    /// leaves the state alone when the current state is not `from`.
    fn transition(&self, user_id: i64, from: SessionState, to: SessionState) -> bool;
}

/// In-memory session store shared by the dispatcher and background tasks
#[derive(Debug, Default)]
pub struct StateManager {
    states: RwLock<HashMap<i64, SessionState>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for StateManager {
    fn get(&self, user_id: i64) -> SessionState {
        self.states
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    fn set(&self, user_id: i64, state: SessionState) {
        self.states
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(user_id, state);
    }

    fn transition(&self, user_id: i64, from: SessionState, to: SessionState) -> bool {
        let mut states = self
            .states
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let current = states.get(&user_id).copied().unwrap_or_default();
        if current != from {
            return false;
        }
        states.insert(user_id, to);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn unknown_users_are_idle() {
        let states = StateManager::new();
        for user_id in [0, 1, -5, i64::MAX] {
            assert_eq!(states.get(user_id), SessionState::Idle);
        }
    }

    #[test]
    fn set_overwrites_without_validation() {
        let states = StateManager::new();

        states.set(1, SessionState::HasLastResult);
        assert_eq!(states.get(1), SessionState::HasLastResult);

        states.set(1, SessionState::WaitingForIdea);
        assert_eq!(states.get(1), SessionState::WaitingForIdea);
        assert_eq!(states.get(2), SessionState::Idle);
    }

    #[test]
    fn transition_only_applies_from_expected_state() {
        let states = StateManager::new();

        assert!(!states.transition(1, SessionState::Processing, SessionState::Idle));
        assert_eq!(states.get(1), SessionState::Idle);

        states.set(1, SessionState::Processing);
        assert!(states.transition(1, SessionState::Processing, SessionState::HasLastResult));
        assert_eq!(states.get(1), SessionState::HasLastResult);

        assert!(!states.transition(1, SessionState::Processing, SessionState::Idle));
        assert_eq!(states.get(1), SessionState::HasLastResult);
    }

    #[test]
    fn concurrent_users_do_not_interfere() {
        let states = Arc::new(StateManager::new());

        let handles: Vec<_> = (0..8)
            .map(|user_id| {
                let states = states.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        states.set(user_id, SessionState::Processing);
                        states.set(user_id, SessionState::HasLastResult);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for user_id in 0..8 {
            assert_eq!(states.get(user_id), SessionState::HasLastResult);
        }
    }
}
