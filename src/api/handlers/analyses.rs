use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::analysis::Analysis;
use crate::domain::repositories::DEFAULT_PAGE_SIZE;

/// Paging query of the listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
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

impl From<Analysis> for AnalysisResponse {
    fn from(analysis: Analysis) -> Self {
        Self {
            id: analysis.id,
            user_id: analysis.user_id,
            idea_text: analysis.idea_text,
            strategist: analysis.strategist,
            financier: analysis.financier,
            auditor: analysis.auditor,
            analyst: analysis.analyst,
            moderator: analysis.moderator,
            created_at: analysis.created_at,
        }
    }
}

/// Saved analyses, newest first
///
/// GET /api/analyses?limit&offset
pub async fn list_analyses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisResponse>>, ApiError> {
    let analyses = state.analyses.list(query.limit, query.offset).await?;

    Ok(Json(analyses.into_iter().map(AnalysisResponse::from).collect()))
}

/// Get a saved analysis by ID
///
/// GET /api/analyses/:id
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let analysis = state
        .analyses
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Analysis not found: {}", id)))?;

    Ok(Json(AnalysisResponse::from(analysis)))
}
