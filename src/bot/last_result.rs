use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::domain::analysis::Analysis;

/// Most recent analysis per user, kept until the user saves it or starts
/// another one
pub trait LastResultStore: Send + Sync {
    /// Store `analysis` as the latest for `user_id`, replacing any previous one
    fn put(&self, user_id: i64, analysis: Analysis);

    /// A copy of the latest analysis for `user_id`
    fn get(&self, user_id: i64) -> Option<Analysis>;
}

#[derive(Debug, Default)]
struct Entries {
    by_user: HashMap<i64, Analysis>,
    /// Users ordered from least to most recently stored
    order: VecDeque<i64>,
}

/// Last-result store holding at most `capacity` users
///
/// Once full, storing a result for a new user evicts the user whose result
/// was stored least recently.
#[derive(Debug)]
pub struct BoundedLastResultStore {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl BoundedLastResultStore {
    /// A zero `capacity` is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LastResultStore for BoundedLastResultStore {
    fn put(&self, user_id: i64, analysis: Analysis) {
        let mut entries = self.lock();

        if entries.by_user.insert(user_id, analysis).is_some() {
            entries.order.retain(|id| *id != user_id);
        }
        entries.order.push_back(user_id);

        while entries.order.len() > self.capacity {
            if let Some(evicted) = entries.order.pop_front() {
                entries.by_user.remove(&evicted);
                tracing::debug!(user_id = evicted, "Evicted last analysis");
            }
        }
    }

    fn get(&self, user_id: i64) -> Option<Analysis> {
        self.lock().by_user.get(&user_id).cloned()
    }
}
