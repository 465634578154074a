use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{Candidate, MovieSummary},
    routes::AppState,
    services::recommendations::Recommendations,
};

#[derive(Debug, Deserialize)]
pub struct MoodQuery {
    pub mood: String,
    pub duration: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Handler for mood recommendations
pub async fn by_mood(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<MoodQuery>,
) -> AppResult<Json<Recommendations<Candidate>>> {
    let limit = state.limit_or_default(params.limit);

    tracing::info!(
        request_id = %request_id,
        mood = %params.mood,
        duration = ?params.duration,
        limit = limit,
        "Processing mood recommendation request"
    );

    let recommendations = state
        .engine
        .recommend_by_mood(&params.mood, params.duration.as_deref(), limit)
        .await?;

    Ok(Json(recommendations))
}

/// Handler for history-based recommendations
pub async fn personalized(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<LimitQuery>,
) -> AppResult<Json<Recommendations<MovieSummary>>> {
    let limit = state.limit_or_default(params.limit);

    tracing::info!(
        request_id = %request_id,
        limit = limit,
        "Processing personalized recommendation request"
    );

    let recommendations = state.engine.recommend_personalized(limit).await?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.movies.len(),
        "Personalized recommendations completed"
    );

    Ok(Json(recommendations))
}
