use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

pub mod mood;
pub mod user_preferences;

pub use mood::{DurationBucket, Mood};
pub use user_preferences::UserPreferenceRecord;

/// TMDB sends `null` for some text and number fields; treat it like an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Minimal catalog projection of a movie, as returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub adult: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Full movie record from `/movie/{id}`, fetched one item at a time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Minutes; 0 when the catalog does not know
    #[serde(default, deserialize_with = "null_as_default")]
    pub runtime: u32,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
}

/// A movie in a recommendation list
///
/// Lists carry bare summaries unless the duration filter had to fetch the
/// detail record, in which case the richer record is kept.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Candidate {
    Detailed(MovieDetail),
    Summary(MovieSummary),
}

impl Candidate {
    pub fn id(&self) -> u64 {
        self.summary().id
    }

    pub fn summary(&self) -> &MovieSummary {
        match self {
            Candidate::Detailed(detail) => &detail.summary,
            Candidate::Summary(summary) => summary,
        }
    }

    pub fn runtime(&self) -> Option<u32> {
        match self {
            Candidate::Detailed(detail) => Some(detail.runtime),
            Candidate::Summary(_) => None,
        }
    }
}

impl From<MovieSummary> for Candidate {
    fn from(summary: MovieSummary) -> Self {
        Candidate::Summary(summary)
    }
}

impl From<MovieDetail> for Candidate {
    fn from(detail: MovieDetail) -> Self {
        Candidate::Detailed(detail)
    }
}

/// One page of a list endpoint (search, similar, trending, discover)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl MoviePage {
    pub fn new(results: Vec<MovieSummary>) -> Self {
        Self {
            page: 1,
            total_results: results.len() as u64,
            total_pages: 1,
            results,
        }
    }
}

/// Response body of `/genre/movie/list`
#[derive(Debug, Clone, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl Display for TrendingWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendingWindow::Day => write!(f, "day"),
            TrendingWindow::Week => write!(f, "week"),
        }
    }
}

/// Sort orders accepted by the discovery endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "vote_average.asc")]
    VoteAverageAsc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "release_date.asc")]
    ReleaseDateAsc,
    #[serde(rename = "original_title.asc")]
    OriginalTitleAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::PopularityDesc => "popularity.desc",
            SortOrder::PopularityAsc => "popularity.asc",
            SortOrder::VoteAverageDesc => "vote_average.desc",
            SortOrder::VoteAverageAsc => "vote_average.asc",
            SortOrder::ReleaseDateDesc => "release_date.desc",
            SortOrder::ReleaseDateAsc => "release_date.asc",
            SortOrder::OriginalTitleAsc => "original_title.asc",
        }
    }
}

/// Parameters for the discovery endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverQuery {
    pub genres: Vec<u64>,
    pub year: Option<i32>,
    pub sort_by: SortOrder,
    pub page: u32,
}

impl Default for DiscoverQuery {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            year: None,
            sort_by: SortOrder::default(),
            page: 1,
        }
    }
}

impl DiscoverQuery {
    pub fn with_genres(genres: Vec<u64>) -> Self {
        Self {
            genres,
            ..Self::default()
        }
    }
}

// ============================================================================
// Pipeline Outcomes
// ============================================================================

/// What one stage of a multi-source operation produced
///
/// Lets callers tell "nothing matched" apart from "the catalog call failed".
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage contributed this many items
    Supplied(usize),
    /// The stage ran but produced nothing
    Empty,
    /// The stage was not needed or had no input
    Skipped,
    /// The catalog call failed
    Failed(String),
}

impl StageOutcome {
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            StageOutcome::Empty
        } else {
            StageOutcome::Supplied(count)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

// ============================================================================
// Viewing Statistics
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    Liked,
    Disliked,
    Neutral,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FavoriteGenre {
    pub name: String,
    pub score: i64,
}

/// A recently watched movie, resolved against the catalog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchedMovie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub status: WatchStatus,
    /// Release date as reported by the catalog
    pub date: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewingStats {
    pub total_watched: usize,
    pub total_liked: usize,
    pub total_disliked: usize,
    pub favorite_genres: Vec<FavoriteGenre>,
    pub watched_movies: Vec<WatchedMovie>,
}

/// Downloadable snapshot of the viewing statistics
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportedStats {
    /// Serialized as `YYYY-MM-DD`
    pub export_date: NaiveDate,
    pub stats: ViewingStats,
}
