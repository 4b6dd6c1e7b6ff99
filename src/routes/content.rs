use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ContentId, ContentItem},
    routes::{AppState, LimitQuery},
    services::recommendations::{DEFAULT_RECOMMENDATION_LIMIT, DEFAULT_RELATED_LIMIT},
};

/// "More like this" for a single item
pub async fn related(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    let limit = query.resolve(DEFAULT_RELATED_LIMIT)?;
    let content_id = ContentId::parse(&content_id);

    Ok(Json(state.engine.get_related_content(&content_id, limit).await))
}

pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    let limit = query.resolve(DEFAULT_RECOMMENDATION_LIMIT)?;
    Ok(Json(state.engine.get_popular_content(limit).await))
}

pub async fn mixed_popular(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    let limit = query.resolve(DEFAULT_RECOMMENDATION_LIMIT)?;
    Ok(Json(state.engine.get_mixed_popular_content(limit).await))
}
