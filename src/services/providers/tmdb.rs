/// TMDB (The Movie Database) provider
///
/// Every request carries the API key and the configured content locale.
///
/// Endpoints used:
/// - Search: /search/movie
/// - Detail: /movie/{id}?append_to_response=credits
/// - Similar: /movie/{id}/recommendations
/// - Trending: /trending/movie/{day|week}
/// - Discover: /discover/movie
/// - Genres: /genre/movie/list
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{DiscoverQuery, Genre, GenreList, MovieDetail, MoviePage, TrendingWindow},
    services::providers::CatalogProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

type QueryParams = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        language: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            language,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_language.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_url, endpoint)
    }

    /// Query parameters for `/discover/movie`
    fn discover_params(query: &DiscoverQuery) -> QueryParams {
        let mut params = vec![
            ("sort_by", query.sort_by.as_str().to_string()),
            ("page", query.page.to_string()),
        ];

        if !query.genres.is_empty() {
            let genres = query
                .genres
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("with_genres", genres));
        }

        if let Some(year) = query.year {
            params.push(("primary_release_year", year.to_string()));
        }

        params
    }

    /// Sends a GET request and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: QueryParams) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.url(endpoint))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", endpoint)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                endpoint = %endpoint,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let results: MoviePage = self
            .get_json(
                "/search/movie",
                vec![("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            query = %query,
            results = results.results.len(),
            total = results.total_results,
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(results)
    }

    async fn movie_detail(&self, movie_id: u64) -> AppResult<MovieDetail> {
        let detail: MovieDetail = self
            .get_json(
                &format!("/movie/{}", movie_id),
                vec![("append_to_response", "credits".to_string())],
            )
            .await?;

        tracing::debug!(
            movie_id = movie_id,
            runtime = detail.runtime,
            genres = detail.genres.len(),
            provider = "tmdb",
            "Movie detail fetched"
        );

        Ok(detail)
    }

    async fn similar_movies(&self, movie_id: u64, page: u32) -> AppResult<MoviePage> {
        self.get_json(
            &format!("/movie/{}/recommendations", movie_id),
            vec![("page", page.to_string())],
        )
        .await
    }

    async fn trending_movies(&self, window: TrendingWindow) -> AppResult<MoviePage> {
        self.get_json(&format!("/trending/movie/{}", window), Vec::new())
            .await
    }

    async fn discover_movies(&self, query: &DiscoverQuery) -> AppResult<MoviePage> {
        let results: MoviePage = self
            .get_json("/discover/movie", Self::discover_params(query))
            .await?;

        tracing::info!(
            genres = ?query.genres,
            year = ?query.year,
            results = results.results.len(),
            provider = "tmdb",
            "Discover query completed"
        );

        Ok(results)
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        let list: GenreList = self.get_json("/genre/movie/list", Vec::new()).await?;
        Ok(list.genres)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
