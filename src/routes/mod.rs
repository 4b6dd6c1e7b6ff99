use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, AppResult},
    middleware::{request_id_middleware, RequestSpan},
    services::RecommendationEngine,
};

pub mod content;
pub mod genres;
pub mod profiles;

/// Largest `limit` any listing endpoint accepts
pub const MAX_LIMIT: i64 = 50;

/// Shared handler state
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// `?limit=` on listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    /// The requested limit, or `default` when absent
    pub fn resolve(&self, default: usize) -> AppResult<usize> {
        match self.limit {
            None => Ok(default),
            Some(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(limit as usize),
            Some(limit) => Err(AppError::InvalidInput(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            ))),
        }
    }
}

/// Creates the application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        // Outside the trace layer so spans see the id
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profiles/:profile_id/recommendations",
            get(profiles::recommendations),
        )
        .route("/content/popular", get(content::popular))
        .route("/content/popular/mixed", get(content::mixed_popular))
        .route("/content/:content_id/related", get(content::related))
        .route("/genres", get(genres::list))
}

async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
