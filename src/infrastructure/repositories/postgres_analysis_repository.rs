use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::agents::types::{AgentReply, Role};
use crate::domain::analysis::Analysis;
use crate::domain::repositories::analysis_repository::{
    clamp_page, AnalysisRepository, RepositoryError,
};

/// Row shape of the `analyses` table
#[derive(Debug, sqlx::FromRow)]
struct AnalysisRow {
    id: i64,
    user_id: i64,
    idea_text: String,
    strategist: Json<AgentReply>,
    financier: Json<AgentReply>,
    auditor: Json<AgentReply>,
    analyst: Json<AgentReply>,
    moderator: Json<AgentReply>,
    created_at: DateTime<Utc>,
}

impl AnalysisRow {
    fn into_analysis(self) -> Result<Analysis, RepositoryError> {
        let mut analysis = Analysis::new(self.user_id, self.idea_text);
        let replies = [
            (Role::Strategist, self.strategist),
            (Role::Financier, self.financier),
            (Role::Auditor, self.auditor),
            (Role::Analyst, self.analyst),
            (Role::Moderator, self.moderator),
        ];
        for (column, Json(reply)) in replies {
            if reply.role != column {
                return Err(RepositoryError::Corrupt {
                    id: self.id,
                    reason: format!("{column} column holds a {} reply", reply.role),
                });
            }
            analysis.set_text(column, reply.content);
        }
        analysis.mark_persisted(self.id, self.created_at);
        Ok(analysis)
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, user_id, idea_text,
        strategist, financier, auditor, analyst, moderator,
        created_at
    FROM analyses
"#;

/// PostgreSQL implementation of AnalysisRepository
///
/// Each of the five reports is stored as a `{role, content}` JSONB value.
pub struct PostgresAnalysisRepository {
    pool: PgPool,
}

impl PostgresAnalysisRepository {
    /// Creates a new PostgresAnalysisRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and verify the connection
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AnalysisRepository for PostgresAnalysisRepository {
    async fn create(&self, analysis: &mut Analysis) -> Result<(), RepositoryError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO analyses (
                user_id, idea_text,
                strategist, financier, auditor, analyst, moderator
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(analysis.user_id)
        .bind(&analysis.idea_text)
        .bind(Json(analysis.reply(Role::Strategist)))
        .bind(Json(analysis.reply(Role::Financier)))
        .bind(Json(analysis.reply(Role::Auditor)))
        .bind(Json(analysis.reply(Role::Analyst)))
        .bind(Json(analysis.reply(Role::Moderator)))
        .fetch_one(&self.pool)
        .await?;

        analysis.mark_persisted(id, created_at);
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<Analysis>, RepositoryError> {
        let row: Option<AnalysisRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(AnalysisRow::into_analysis).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Analysis>, RepositoryError> {
        let (limit, offset) = clamp_page(limit, offset);

        let rows: Vec<AnalysisRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AnalysisRow::into_analysis).collect()
    }
}
