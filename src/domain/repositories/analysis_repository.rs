use async_trait::async_trait;
use thiserror::Error;

use crate::domain::analysis::Analysis;

/// Page size used when a caller passes a non-positive limit
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Storage failures surfaced to callers
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Clamp paging arguments: `limit <= 0` becomes [`DEFAULT_PAGE_SIZE`],
/// `offset < 0` becomes 0
pub fn clamp_page(limit: i64, offset: i64) -> (i64, i64) {
    let limit = if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit };
    (limit, offset.max(0))
}

/// Repository trait for saved analyses
///
/// Implementations hand out independent copies; mutating a returned
/// analysis never affects stored state.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Persist a new analysis, filling in its `id` and `created_at`
    async fn create(&self, analysis: &mut Analysis) -> Result<(), RepositoryError>;

    /// Find an analysis by its ID
    async fn get(&self, id: i64) -> Result<Option<Analysis>, RepositoryError>;

    /// Page through analyses, newest first. Arguments are clamped with
    /// [`clamp_page`].
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Analysis>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_page_applies_defaults() {
        assert_eq!(clamp_page(0, 0), (DEFAULT_PAGE_SIZE, 0));
        assert_eq!(clamp_page(-3, -1), (DEFAULT_PAGE_SIZE, 0));
        assert_eq!(clamp_page(5, 20), (5, 20));
    }
}
