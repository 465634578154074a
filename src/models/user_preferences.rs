use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::WatchStatus;
use crate::error::{AppError, AppResult};

/// Everything we remember about the user
///
/// `watched` keeps chronological order and never holds duplicates. `liked`
/// and `disliked` are used as sets and are always disjoint. `preferences`
/// maps a genre name to its net like/dislike score; a missing genre scores 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreferenceRecord {
    #[serde(default)]
    pub watched: Vec<u64>,
    #[serde(default)]
    pub liked: Vec<u64>,
    #[serde(default)]
    pub disliked: Vec<u64>,
    #[serde(default)]
    pub preferences: BTreeMap<String, i64>,
}

impl UserPreferenceRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a persisted record
    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json).map_err(|e| AppError::StorageCorrupt(e.to_string()))
    }

    /// Marks a movie as watched and applies an optional verdict
    ///
    /// Watching again does not add a second entry. A verdict moves the movie
    /// into `liked` or `disliked` and out of the other one.
    pub fn mark_watched(&mut self, movie_id: u64, liked: Option<bool>) {
        if !self.watched.contains(&movie_id) {
            self.watched.push(movie_id);
        }

        match liked {
            Some(true) => {
                if !self.liked.contains(&movie_id) {
                    self.liked.push(movie_id);
                }
                self.disliked.retain(|id| *id != movie_id);
            }
            Some(false) => {
                if !self.disliked.contains(&movie_id) {
                    self.disliked.push(movie_id);
                }
                self.liked.retain(|id| *id != movie_id);
            }
            None => {}
        }
    }

    /// Adds `delta` to a genre's score, starting from 0
    pub fn adjust_genre(&mut self, genre: &str, delta: i64) {
        *self.preferences.entry(genre.to_string()).or_insert(0) += delta;
    }

    pub fn genre_score(&self, genre: &str) -> i64 {
        self.preferences.get(genre).copied().unwrap_or(0)
    }

    pub fn has_watched(&self, movie_id: u64) -> bool {
        self.watched.contains(&movie_id)
    }

    pub fn status_of(&self, movie_id: u64) -> WatchStatus {
        if self.liked.contains(&movie_id) {
            WatchStatus::Liked
        } else if self.disliked.contains(&movie_id) {
            WatchStatus::Disliked
        } else {
            WatchStatus::Neutral
        }
    }

    /// Genres ordered by score, highest first; equal scores keep name order
    pub fn ranked_genres(&self) -> Vec<(&str, i64)> {
        let mut ranked: Vec<(&str, i64)> = self
            .preferences
            .iter()
            .map(|(name, score)| (name.as_str(), *score))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` best-ranked genres whose score is above zero
    pub fn top_positive_genres(&self, n: usize) -> Vec<(&str, i64)> {
        self.ranked_genres()
            .into_iter()
            .take(n)
            .filter(|(_, score)| *score > 0)
            .collect()
    }

    /// The most recent `n` watches, oldest first
    pub fn recent_watches(&self, n: usize) -> &[u64] {
        let start = self.watched.len().saturating_sub(n);
        &self.watched[start..]
    }
}
