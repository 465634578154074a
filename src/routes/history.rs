use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{UserPreferenceRecord, ViewingStats},
    routes::AppState,
    services::{
        preference_store::WatchReceipt,
        stats::{export_stats, viewing_stats},
    },
};

#[derive(Debug, Deserialize)]
pub struct WatchRequest {
    pub movie_id: u64,
    /// `true` liked, `false` disliked, absent or null for no verdict
    #[serde(default)]
    pub liked: Option<bool>,
}

/// Current preference record
pub async fn show(State(state): State<Arc<AppState>>) -> Json<UserPreferenceRecord> {
    Json(state.store.snapshot().await)
}

/// Handler for recording a watched movie
pub async fn record_watch(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<WatchRequest>,
) -> AppResult<Json<WatchReceipt>> {
    tracing::info!(
        request_id = %request_id,
        movie_id = request.movie_id,
        liked = ?request.liked,
        "Recording watch"
    );

    let receipt = state
        .store
        .record_watch(
            state.catalog.as_ref(),
            state.genres.as_ref(),
            request.movie_id,
            request.liked,
        )
        .await?;

    Ok(Json(receipt))
}

/// Handler for clearing the whole history
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    state.store.reset().await?;

    tracing::info!(request_id = %request_id, "Viewing history reset");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for viewing statistics
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<ViewingStats> {
    let record = state.store.snapshot().await;
    let stats = viewing_stats(
        state.catalog.as_ref(),
        &record,
        state.config.recent_watch_window,
    )
    .await;

    Json(stats)
}

/// Handler for downloading the viewing statistics as a JSON file
pub async fn export(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> impl IntoResponse {
    tracing::info!(request_id = %request_id, "Exporting viewing data");

    let record = state.store.snapshot().await;
    let exported = export_stats(
        state.catalog.as_ref(),
        &record,
        state.config.recent_watch_window,
        chrono::Local::now().date_naive(),
    )
    .await;

    (
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"my_movie_data.json\"",
        )],
        Json(exported),
    )
}
