use serde::Deserialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{DiscoverQuery, MoviePage, MovieSummary, SortOrder},
    services::providers::CatalogProvider,
};

/// Keyword search
///
/// Delegates to the catalog provider; a blank query is rejected before any
/// request is made.
pub async fn search_titles(
    provider: &dyn CatalogProvider,
    query: &str,
    page: u32,
) -> AppResult<MoviePage> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    provider.search_movies(query.trim(), page.max(1)).await
}

/// How many recent keyword searches are kept
pub const SEARCH_HISTORY_LIMIT: usize = 10;

/// Recent keyword searches, newest first, without duplicates
///
/// Held in memory for the life of the process.
#[derive(Debug, Default)]
pub struct SearchHistory {
    queries: RwLock<VecDeque<String>>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers a query; blank or already-known queries are ignored
    pub async fn record(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let mut queries = self.queries.write().await;
        if queries.iter().any(|known| known == query) {
            return;
        }
        queries.push_front(query.to_string());
        queries.truncate(SEARCH_HISTORY_LIMIT);
    }

    pub async fn recent(&self) -> Vec<String> {
        self.queries.read().await.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.queries.write().await.clear();
    }
}

/// Filters for the advanced search form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdvancedSearch {
    /// When set, a keyword search is run and `genres`, `year` and `sort_by` are ignored
    pub query: Option<String>,
    pub genres: Vec<u64>,
    pub year: Option<i32>,
    pub sort_by: SortOrder,
    /// Drop results rated below this (0–10)
    pub min_rating: f64,
    pub include_adult: bool,
}

/// Keyword or discovery search, then rating and adult-content filtering
pub async fn advanced_search(
    provider: &dyn CatalogProvider,
    params: &AdvancedSearch,
) -> AppResult<Vec<MovieSummary>> {
    if !(0.0..=10.0).contains(&params.min_rating) {
        return Err(AppError::InvalidInput(format!(
            "min_rating must be between 0 and 10, got {}",
            params.min_rating
        )));
    }

    let keyword = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    // A keyword overrides the discovery filters
    let page = match keyword {
        Some(query) => provider.search_movies(query, 1).await?,
        None => {
            let query = DiscoverQuery {
                genres: params.genres.clone(),
                year: params.year,
                sort_by: params.sort_by,
                page: 1,
            };
            provider.discover_movies(&query).await?
        }
    };

    let fetched = page.results.len();
    let results: Vec<MovieSummary> = page
        .results
        .into_iter()
        .filter(|movie| movie.vote_average >= params.min_rating)
        .filter(|movie| params.include_adult || !movie.adult)
        .collect();

    tracing::info!(
        keyword = ?keyword,
        fetched = fetched,
        kept = results.len(),
        "Advanced search completed"
    );

    Ok(results)
}
