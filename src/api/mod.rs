// API layer module (read-only adapter over saved analyses)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::repositories::AnalysisRepository;

/// Shared state of the HTTP routes
#[derive(Clone)]
pub struct AppState {
    pub analyses: Arc<dyn AnalysisRepository>,
}

impl AppState {
    pub fn new(analyses: Arc<dyn AnalysisRepository>) -> Self {
        Self { analyses }
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/analyses", get(handlers::analyses::list_analyses))
        .route("/api/analyses/:id", get(handlers::analyses::get_analysis))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
