use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

// TMDB movie genre ids
const COMEDY: u64 = 35;
const ANIMATION: u64 = 16;
const FAMILY: u64 = 10751;
const DRAMA: u64 = 18;
const ROMANCE: u64 = 10749;
const ADVENTURE: u64 = 12;
const FANTASY: u64 = 14;
const SCIENCE_FICTION: u64 = 878;
const ACTION: u64 = 28;
const THRILLER: u64 = 53;
const CRIME: u64 = 80;
const HORROR: u64 = 27;
const MYSTERY: u64 = 9648;
const DOCUMENTARY: u64 = 99;
const HISTORY: u64 = 36;

/// Emotional state a user picks before asking for recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Relaxed,
    Excited,
    Scared,
    Bored,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Relaxed,
        Mood::Excited,
        Mood::Scared,
        Mood::Bored,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Relaxed => "relaxed",
            Mood::Excited => "excited",
            Mood::Scared => "scared",
            Mood::Bored => "bored",
        }
    }

    /// Catalog genres that suit this mood
    pub fn genre_ids(&self) -> &'static [u64] {
        match self {
            Mood::Happy => &[COMEDY, ANIMATION, FAMILY],
            Mood::Sad => &[DRAMA, ROMANCE],
            Mood::Relaxed => &[ADVENTURE, FANTASY, SCIENCE_FICTION],
            Mood::Excited => &[ACTION, THRILLER, CRIME],
            Mood::Scared => &[HORROR, MYSTERY],
            Mood::Bored => &[DOCUMENTARY, HISTORY],
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Mood {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| AppError::NotFound(format!("Unknown mood: {}", s)))
    }
}

/// How much time the user has for a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBucket {
    /// Under an hour
    Short,
    /// One to two hours
    Standard,
    /// Two to three hours
    Long,
    /// Three hours and up
    ExtraLong,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 4] = [
        DurationBucket::Short,
        DurationBucket::Standard,
        DurationBucket::Long,
        DurationBucket::ExtraLong,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationBucket::Short => "short",
            DurationBucket::Standard => "standard",
            DurationBucket::Long => "long",
            DurationBucket::ExtraLong => "extra_long",
        }
    }

    /// Half-open runtime range in minutes: `min <= runtime < max`
    pub fn range(&self) -> (u32, u32) {
        match self {
            DurationBucket::Short => (0, 60),
            DurationBucket::Standard => (60, 120),
            DurationBucket::Long => (120, 180),
            DurationBucket::ExtraLong => (180, 10_000),
        }
    }

    pub fn contains(&self, runtime: u32) -> bool {
        let (min, max) = self.range();
        min <= runtime && runtime < max
    }
}

impl Display for DurationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DurationBucket {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        DurationBucket::ALL
            .into_iter()
            .find(|bucket| bucket.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| AppError::NotFound(format!("Unknown duration: {}", s)))
    }
}

/// Genre ids for a mood label; empty when the label is not a known mood
pub fn genres_for_mood(mood: &str) -> &'static [u64] {
    match mood.parse::<Mood>() {
        Ok(mood) => mood.genre_ids(),
        Err(e) => {
            tracing::debug!(error = %e, "Falling back to trending");
            &[]
        }
    }
}

/// Duration bucket for an optional label; `None` means no runtime filtering
pub fn duration_for_key(key: Option<&str>) -> Option<DurationBucket> {
    let key = key?;
    match key.parse::<DurationBucket>() {
        Ok(bucket) => Some(bucket),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring duration filter");
            None
        }
    }
}

/// Runtime range for an optional duration label; `None` means unbounded
pub fn range_for_duration(key: Option<&str>) -> Option<(u32, u32)> {
    duration_for_key(key).map(|bucket| bucket.range())
}
