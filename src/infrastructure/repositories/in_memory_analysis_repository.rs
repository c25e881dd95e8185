use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::analysis::Analysis;
use crate::domain::repositories::analysis_repository::{
    clamp_page, AnalysisRepository, RepositoryError,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: Vec<Analysis>,
}

/// Process-local implementation of AnalysisRepository
///
/// Keeps rows in insertion order; ids increase monotonically so newest-first
/// is simply reverse order.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisRepository {
    inner: Mutex<Inner>,
}

impl InMemoryAnalysisRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn create(&self, analysis: &mut Analysis) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        inner.next_id += 1;
        analysis.mark_persisted(inner.next_id, Utc::now());
        inner.rows.push(analysis.clone());
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Analysis>, RepositoryError> {
        Ok(self.lock().rows.iter().find(|a| a.id == Some(id)).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Analysis>, RepositoryError> {
        let (limit, offset) = clamp_page(limit, offset);
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .lock()
            .rows
            .iter()
            .rev()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}
