use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cinemood_api::{
    config::Config,
    error::{AppError, AppResult},
    models::{DiscoverQuery, Genre, MovieDetail, MoviePage, MovieSummary, TrendingWindow},
    routes::{create_router, AppState},
    services::{
        genre_directory::GenreDirectory, preference_store::PreferenceStore,
        providers::CatalogProvider,
    },
};

/// In-memory catalog: every movie has a detail record, discovery and
/// trending return fixed lists.
#[derive(Default)]
struct FakeCatalog {
    details: HashMap<u64, MovieDetail>,
    discover: Vec<u64>,
    trending: Vec<u64>,
}

impl FakeCatalog {
    fn with_movie(mut self, id: u64, runtime: u32, genres: &[(u64, &str)]) -> Self {
        self.details.insert(
            id,
            MovieDetail {
                summary: summary(id),
                runtime,
                genres: genres
                    .iter()
                    .map(|(id, name)| Genre {
                        id: *id,
                        name: name.to_string(),
                    })
                    .collect(),
                credits: None,
            },
        );
        self
    }

    fn page(&self, ids: &[u64]) -> MoviePage {
        MoviePage::new(ids.iter().map(|id| summary(*id)).collect())
    }
}

fn summary(id: u64) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {}", id),
        poster_path: Some(format!("/poster{}.jpg", id)),
        vote_average: 7.0,
        release_date: "2001-04-25".to_string(),
        overview: String::new(),
        adult: false,
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search_movies(&self, query: &str, _page: u32) -> AppResult<MoviePage> {
        let ids: Vec<u64> = self
            .details
            .values()
            .filter(|d| d.summary.title.contains(query))
            .map(|d| d.summary.id)
            .collect();
        Ok(self.page(&ids))
    }

    async fn movie_detail(&self, movie_id: u64) -> AppResult<MovieDetail> {
        self.details
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", movie_id)))
    }

    async fn similar_movies(&self, _movie_id: u64, _page: u32) -> AppResult<MoviePage> {
        Err(AppError::ExternalApi("similar is unavailable".to_string()))
    }

    async fn trending_movies(&self, _window: TrendingWindow) -> AppResult<MoviePage> {
        Ok(self.page(&self.trending))
    }

    async fn discover_movies(&self, _query: &DiscoverQuery) -> AppResult<MoviePage> {
        Ok(self.page(&self.discover))
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        Ok(vec![Genre {
            id: 35,
            name: "Comedy".to_string(),
        }])
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

async fn create_test_state(catalog: FakeCatalog) -> (Arc<AppState>, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = Config::with_api_key("test-key");
    config.user_data_path = dir.path().join("user_data.json").display().to_string();

    let catalog: Arc<dyn CatalogProvider> = Arc::new(catalog);
    let genres = GenreDirectory::load(catalog.as_ref()).await.unwrap();
    let store = PreferenceStore::open(&config.user_data_path).await;

    (Arc::new(AppState::new(config, catalog, genres, store)), dir)
}

async fn send(state: &Arc<AppState>, request: Request<Body>) -> Response<Body> {
    create_router(state.clone()).oneshot(request).await.unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> Response<Body> {
    send(state, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(state: &Arc<AppState>, uri: &str, body: Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(state, request).await
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn ids(movies: &Value) -> Vec<u64> {
    movies
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;

    let response = get(&state, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_mood_recommendations_filter_by_duration() {
    let catalog = FakeCatalog {
        discover: vec![1, 2, 3],
        ..FakeCatalog::default()
    }
    .with_movie(1, 45, &[])
    .with_movie(2, 100, &[])
    .with_movie(3, 30, &[]);
    let (state, _dir) = create_test_state(catalog).await;

    let response = get(
        &state,
        "/api/v1/recommendations/mood?mood=happy&duration=short",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(ids(&body["movies"]), vec![1, 3]);
    assert_eq!(body["movies"][0]["runtime"], 45);
    assert_eq!(body["stages"][0]["stage"], "mood_discovery");
    assert_eq!(body["stages"][1]["outcome"]["status"], "supplied");
}

#[tokio::test]
async fn test_unknown_mood_falls_back_to_trending() {
    let catalog = FakeCatalog {
        discover: vec![1],
        trending: vec![7, 8],
        ..FakeCatalog::default()
    };
    let (state, _dir) = create_test_state(catalog).await;

    let response = get(&state, "/api/v1/recommendations/mood?mood=nostalgic&limit=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(ids(&body["movies"]), vec![7]);
    assert_eq!(body["stages"][0]["stage"], "trending");
}

#[tokio::test]
async fn test_record_watch_then_stats() {
    let catalog = FakeCatalog::default().with_movie(10, 95, &[(35, "Comedy")]);
    let (state, _dir) = create_test_state(catalog).await;

    let response = post_json(
        &state,
        "/api/v1/history",
        json!({ "movie_id": 10, "liked": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = json_body(response).await;
    assert_eq!(receipt["record"]["liked"], json!([10]));
    assert_eq!(receipt["record"]["preferences"]["Comedy"], 1);

    let response = get(&state, "/api/v1/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;
    assert_eq!(stats["total_watched"], 1);
    assert_eq!(stats["total_liked"], 1);
    assert_eq!(stats["favorite_genres"], json!([{ "name": "Comedy", "score": 1 }]));
    assert_eq!(stats["watched_movies"][0]["status"], "liked");
    assert_eq!(stats["watched_movies"][0]["date"], "2001-04-25");
}

#[tokio::test]
async fn test_watch_persists_when_detail_lookup_fails() {
    let (state, dir) = create_test_state(FakeCatalog::default()).await;

    let response = post_json(
        &state,
        "/api/v1/history",
        json!({ "movie_id": 404, "liked": false }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let receipt = json_body(response).await;
    assert_eq!(receipt["record"]["disliked"], json!([404]));
    assert_eq!(receipt["affinity"]["status"], "failed");

    let saved = std::fs::read_to_string(dir.path().join("user_data.json")).unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["watched"], json!([404]));
}

#[tokio::test]
async fn test_export_stats_as_download() {
    let catalog = FakeCatalog::default().with_movie(10, 95, &[(35, "Comedy")]);
    let (state, _dir) = create_test_state(catalog).await;

    post_json(
        &state,
        "/api/v1/history",
        json!({ "movie_id": 10, "liked": true }),
    )
    .await;

    let response = get(&state, "/api/v1/stats/export").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("attachment"));

    let body = json_body(response).await;
    let export_date = body["export_date"].as_str().unwrap();
    assert!(chrono::NaiveDate::parse_from_str(export_date, "%Y-%m-%d").is_ok());
    assert_eq!(body["stats"]["total_watched"], 1);
    assert_eq!(body["stats"]["favorite_genres"][0]["name"], "Comedy");
}

#[tokio::test]
async fn test_search_history_tracks_recent_queries() {
    let catalog = FakeCatalog::default().with_movie(1, 90, &[]);
    let (state, _dir) = create_test_state(catalog).await;

    get(&state, "/api/v1/movies/search?q=Movie").await;
    get(&state, "/api/v1/movies/search?q=heat").await;
    get(&state, "/api/v1/movies/search?q=Movie").await;
    get(&state, "/api/v1/movies/search?q=%20").await;

    let history = json_body(get(&state, "/api/v1/movies/search/history").await).await;
    assert_eq!(history, json!(["heat", "Movie"]));

    let request = Request::delete("/api/v1/movies/search/history")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&state, request).await.status(), StatusCode::NO_CONTENT);

    let history = json_body(get(&state, "/api/v1/movies/search/history").await).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_reset_clears_history() {
    let catalog = FakeCatalog::default().with_movie(10, 95, &[(35, "Comedy")]);
    let (state, _dir) = create_test_state(catalog).await;

    post_json(&state, "/api/v1/history", json!({ "movie_id": 10 })).await;

    let request = Request::delete("/api/v1/history")
        .body(Body::empty())
        .unwrap();
    let response = send(&state, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let record = json_body(get(&state, "/api/v1/history").await).await;
    assert_eq!(
        record,
        json!({ "watched": [], "liked": [], "disliked": [], "preferences": {} })
    );
}

#[tokio::test]
async fn test_personalized_cold_start_uses_trending() {
    let catalog = FakeCatalog {
        trending: vec![4, 5, 6],
        ..FakeCatalog::default()
    };
    let (state, _dir) = create_test_state(catalog).await;

    let response = get(&state, "/api/v1/recommendations/personalized?limit=2").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(ids(&body["movies"]), vec![4, 5]);
    assert_eq!(body["stages"][0]["outcome"]["status"], "skipped");
}

#[tokio::test]
async fn test_blank_search_is_bad_request() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;

    let response = get(&state, "/api/v1/movies/search?q=%20%20").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_unknown_movie_is_not_found() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;

    let response = get(&state, "/api/v1/movies/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_similar_failure_is_bad_gateway() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;

    let response = get(&state, "/api/v1/movies/1/similar").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_genres_listed() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;

    let body = json_body(get(&state, "/api/v1/genres").await).await;

    assert_eq!(body, json!([{ "id": 35, "name": "Comedy" }]));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;
    let request_id = uuid::Uuid::new_v4().to_string();

    let request = Request::get("/health")
        .header("x-request-id", &request_id)
        .body(Body::empty())
        .unwrap();
    let response = send(&state, request).await;

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        request_id.as_str()
    );
}

#[tokio::test]
async fn test_request_id_generated_when_missing() {
    let (state, _dir) = create_test_state(FakeCatalog::default()).await;

    let response = get(&state, "/health").await;

    let header = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
