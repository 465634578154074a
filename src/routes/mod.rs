use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        genre_directory::GenreDirectory,
        preference_store::PreferenceStore,
        providers::CatalogProvider,
        recommendations::{EngineSettings, RecommendationEngine},
        title_search::SearchHistory,
    },
};

pub mod history;
pub mod movies;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<dyn CatalogProvider>,
    pub genres: Arc<GenreDirectory>,
    pub store: Arc<PreferenceStore>,
    pub engine: RecommendationEngine,
    pub search_history: SearchHistory,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn CatalogProvider>,
        genres: GenreDirectory,
        store: PreferenceStore,
    ) -> Self {
        let genres = Arc::new(genres);
        let store = Arc::new(store);
        let engine = RecommendationEngine::new(
            catalog.clone(),
            genres.clone(),
            store.clone(),
            EngineSettings {
                duration_match_cap: config.duration_match_cap,
            },
        );

        Self {
            config,
            catalog,
            genres,
            store,
            engine,
            search_history: SearchHistory::new(),
        }
    }

    /// Requested list size, or the configured default
    pub fn limit_or_default(&self, limit: Option<usize>) -> usize {
        limit.unwrap_or(self.config.default_limit)
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations/mood", get(recommendations::by_mood))
        .route(
            "/recommendations/personalized",
            get(recommendations::personalized),
        )
        .route(
            "/history",
            get(history::show)
                .post(history::record_watch)
                .delete(history::reset),
        )
        .route("/stats", get(history::stats))
        .route("/stats/export", get(history::export))
        .route("/movies/search", get(movies::search))
        .route(
            "/movies/search/history",
            get(movies::search_history).delete(movies::clear_search_history),
        )
        .route("/movies/discover", post(movies::discover))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/:id", get(movies::detail))
        .route("/movies/:id/similar", get(movies::similar))
        .route("/genres", get(movies::genres))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
