use rand::seq::SliceRandom;
use serde::Serialize;
use std::{collections::HashSet, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{
        mood::{duration_for_key, genres_for_mood},
        Candidate, DiscoverQuery, MoviePage, MovieSummary, StageOutcome, TrendingWindow,
    },
    services::{
        candidate_filter::filter_by_duration, genre_directory::GenreDirectory,
        preference_store::PreferenceStore, providers::CatalogProvider,
    },
};

/// How many preferred genres seed the genre discovery stage
const PREFERRED_GENRE_COUNT: usize = 2;

/// Named stages of the recommendation pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    MoodDiscovery,
    Trending,
    DurationFilter,
    SimilarToLiked,
    PreferredGenres,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
}

/// A recommendation list plus how each stage fared
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations<T> {
    pub movies: Vec<T>,
    pub stages: Vec<StageReport>,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Duration filter stops after this many matches
    pub duration_match_cap: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            duration_match_cap: 20,
        }
    }
}

/// Mood-based and personalized recommendations
///
/// Holds the catalog, the genre directory and the preference store it
/// consults; nothing is cached between calls.
#[derive(Clone)]
pub struct RecommendationEngine {
    provider: Arc<dyn CatalogProvider>,
    directory: Arc<GenreDirectory>,
    store: Arc<PreferenceStore>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        directory: Arc<GenreDirectory>,
        store: Arc<PreferenceStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            provider,
            directory,
            store,
            settings,
        }
    }

    /// Movies matching a mood and, optionally, a duration bucket
    ///
    /// An unknown mood falls back to trending movies, an unknown duration to no
    /// runtime filter. Order is whatever the catalog returned. Fails only when
    /// the candidate pool itself cannot be fetched.
    pub async fn recommend_by_mood(
        &self,
        mood: &str,
        duration: Option<&str>,
        limit: usize,
    ) -> AppResult<Recommendations<Candidate>> {
        let genre_ids = genres_for_mood(mood);
        let duration = duration_for_key(duration);
        let mut stages = Vec::new();

        // Unknown mood means no genre set, so the pool comes from trending
        let (stage, pool) = if genre_ids.is_empty() {
            let page = self.provider.trending_movies(TrendingWindow::Week).await?;
            (Stage::Trending, page.results)
        } else {
            let query = DiscoverQuery::with_genres(genre_ids.to_vec());
            let page = self.provider.discover_movies(&query).await?;
            (Stage::MoodDiscovery, page.results)
        };
        stages.push(StageReport {
            stage,
            outcome: StageOutcome::from_count(pool.len()),
        });

        let report = filter_by_duration(
            self.provider.as_ref(),
            pool,
            duration,
            self.settings.duration_match_cap,
        )
        .await;
        stages.push(StageReport {
            stage: Stage::DurationFilter,
            outcome: report.outcome(duration),
        });

        let mut movies = report.candidates;
        movies.truncate(limit);

        tracing::info!(
            mood = %mood,
            duration = ?duration,
            count = movies.len(),
            "Mood recommendations ready"
        );

        Ok(Recommendations { movies, stages })
    }

    /// Recommendations from the user's own history
    ///
    /// Sources are tried in order, each only while the pool is short of
    /// `limit`: movies similar to a random liked movie, discovery over the two
    /// best-scoring genres, then trending. The pool is deduplicated and
    /// anything already watched is dropped. A failing source is recorded in
    /// the stage report and the next one is tried.
    pub async fn recommend_personalized(
        &self,
        limit: usize,
    ) -> AppResult<Recommendations<MovieSummary>> {
        let record = self.store.snapshot().await;
        let mut pool: Vec<MovieSummary> = Vec::new();
        let mut stages = Vec::new();

        // Similar to a liked movie
        let seed = {
            let mut rng = rand::thread_rng();
            record.liked.choose(&mut rng).copied()
        };
        let outcome = match seed {
            None => StageOutcome::Skipped,
            Some(movie_id) => self.collect(&mut pool, self.provider.similar_movies(movie_id, 1).await),
        };
        stages.push(StageReport {
            stage: Stage::SimilarToLiked,
            outcome,
        });

        // Top preferred genres, only while still short
        let outcome = if pool.len() < limit && !record.preferences.is_empty() {
            let genre_ids: Vec<u64> = record
                .top_positive_genres(PREFERRED_GENRE_COUNT)
                .into_iter()
                .filter_map(|(name, _)| self.directory.id_of(name))
                .collect();

            if genre_ids.is_empty() {
                StageOutcome::Empty
            } else {
                let query = DiscoverQuery::with_genres(genre_ids);
                self.collect(&mut pool, self.provider.discover_movies(&query).await)
            }
        } else {
            StageOutcome::Skipped
        };
        stages.push(StageReport {
            stage: Stage::PreferredGenres,
            outcome,
        });

        // Trending fills whatever is left
        let outcome = if pool.len() < limit {
            self.collect(
                &mut pool,
                self.provider.trending_movies(TrendingWindow::Week).await,
            )
        } else {
            StageOutcome::Skipped
        };
        stages.push(StageReport {
            stage: Stage::Trending,
            outcome,
        });

        // First occurrence wins; anything already watched is dropped
        let mut seen = HashSet::new();
        let mut movies: Vec<MovieSummary> = pool
            .into_iter()
            .filter(|movie| !record.has_watched(movie.id) && seen.insert(movie.id))
            .collect();
        movies.truncate(limit);

        let any_failed = stages.iter().any(|s| s.outcome.is_failed());
        if movies.is_empty() && any_failed {
            return Err(AppError::ExternalApi(
                "Every recommendation source failed".to_string(),
            ));
        }

        tracing::info!(
            count = movies.len(),
            seed = ?seed,
            stages = ?stages,
            "Personalized recommendations ready"
        );

        Ok(Recommendations { movies, stages })
    }

    /// Appends a stage's results to the pool, turning a failure into an outcome
    fn collect(
        &self,
        pool: &mut Vec<MovieSummary>,
        result: AppResult<MoviePage>,
    ) -> StageOutcome {
        match result {
            Ok(page) => {
                let count = page.results.len();
                pool.extend(page.results);
                StageOutcome::from_count(count)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.provider.name(),
                    "Recommendation source failed"
                );
                StageOutcome::Failed(e.to_string())
            }
        }
    }
}
