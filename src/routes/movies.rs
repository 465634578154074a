use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{Genre, MovieDetail, MoviePage, MovieSummary, TrendingWindow},
    routes::AppState,
    services::title_search::{self, AdvancedSearch},
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    #[serde(default = "first_page")]
    page: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default)]
    window: TrendingWindow,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

/// Handler for keyword search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<MoviePage>> {
    tracing::info!(
        request_id = %request_id,
        query = %params.q,
        page = params.page,
        "Searching movies"
    );

    state.search_history.record(&params.q).await;
    let page = title_search::search_titles(state.catalog.as_ref(), &params.q, params.page).await?;
    Ok(Json(page))
}

/// Recent keyword searches, newest first
pub async fn search_history(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.search_history.recent().await)
}

pub async fn clear_search_history(State(state): State<Arc<AppState>>) -> StatusCode {
    state.search_history.clear().await;
    StatusCode::NO_CONTENT
}

/// Handler for the advanced search form
pub async fn discover(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(params): Json<AdvancedSearch>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    tracing::info!(
        request_id = %request_id,
        genres = ?params.genres,
        year = ?params.year,
        "Processing advanced search"
    );

    let results = title_search::advanced_search(state.catalog.as_ref(), &params).await?;
    Ok(Json(results))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = state.catalog.trending_movies(params.window).await?;
    Ok(Json(page))
}

/// Handler for a single movie with credits
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<MovieDetail>> {
    tracing::info!(request_id = %request_id, movie_id = movie_id, "Fetching movie detail");

    let detail = state.catalog.movie_detail(movie_id).await?;
    Ok(Json(detail))
}

pub async fn similar(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<u64>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = state
        .catalog
        .similar_movies(movie_id, params.page.max(1))
        .await?;
    Ok(Json(page))
}

/// Genre list loaded at startup
pub async fn genres(State(state): State<Arc<AppState>>) -> Json<Vec<Genre>> {
    Json(state.genres.genres())
}
