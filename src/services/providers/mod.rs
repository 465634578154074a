//! Movie catalog provider abstraction
//!
//! The recommendation engine, the duration filter, the statistics view and the
//! search endpoints only ever talk to the catalog through this trait, so tests
//! can substitute a mock and a different metadata source can be plugged in.

use crate::{
    error::AppResult,
    models::{DiscoverQuery, Genre, MovieDetail, MoviePage, TrendingWindow},
};

pub mod tmdb;

/// Trait for movie catalog providers
///
/// Every call may fail independently (network error, non-2xx status). Callers
/// decide per call site whether a failure is fatal or just "no data".
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Keyword search
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage>;

    /// Full record for one movie, including runtime, genres and credits
    async fn movie_detail(&self, movie_id: u64) -> AppResult<MovieDetail>;

    /// Movies the catalog considers similar to `movie_id`
    async fn similar_movies(&self, movie_id: u64, page: u32) -> AppResult<MoviePage>;

    async fn trending_movies(&self, window: TrendingWindow) -> AppResult<MoviePage>;

    /// Filtered listing by genre set, release year and sort order
    async fn discover_movies(&self, query: &DiscoverQuery) -> AppResult<MoviePage>;

    /// Genre id → name directory
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
