use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::ContentItem,
    routes::{AppState, LimitQuery},
    services::recommendations::DEFAULT_RECOMMENDATION_LIMIT,
};

/// Personalized recommendations for a profile
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(profile_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<ContentItem>>> {
    let limit = query.resolve(DEFAULT_RECOMMENDATION_LIMIT)?;

    tracing::info!(
        request_id = %request_id,
        profile_id = %profile_id,
        limit,
        "Processing recommendation request"
    );

    let items = state.engine.get_recommendations(&profile_id, limit).await;

    Ok(Json(items))
}
