use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{StageOutcome, UserPreferenceRecord},
    services::{genre_directory::GenreDirectory, providers::CatalogProvider},
};

/// Result of recording a watch event
#[derive(Debug, Clone, serde::Serialize)]
pub struct WatchReceipt {
    /// The record as persisted after the event
    pub record: UserPreferenceRecord,
    /// Genre affinity update: skipped without a verdict, failed when the
    /// detail lookup failed (the watch itself is still recorded)
    pub affinity: StageOutcome,
}

/// File-backed store for the single user's preference record
///
/// The whole record is rewritten after every change. A single process is
/// assumed; concurrent writers from other processes can lose updates.
pub struct PreferenceStore {
    path: PathBuf,
    record: RwLock<UserPreferenceRecord>,
}

impl PreferenceStore {
    /// Opens the store, creating an empty record if none exists
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = Self::load(&path).await;

        tracing::info!(
            path = %path.display(),
            watched = record.watched.len(),
            genres = record.preferences.len(),
            "Preference store opened"
        );

        Self {
            path,
            record: RwLock::new(record),
        }
    }

    /// Reads the persisted record
    ///
    /// A missing, unreadable or malformed file yields a fresh empty record,
    /// which is written back immediately.
    pub async fn load(path: &Path) -> UserPreferenceRecord {
        let parsed = match tokio::fs::read_to_string(path).await {
            Ok(contents) => UserPreferenceRecord::from_json(&contents).map_err(|e| {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Preference data is corrupt, starting from an empty record"
                );
            }),
            // First run
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Preference data is unreadable, starting from an empty record"
                );
                Err(())
            }
        };

        match parsed {
            Ok(record) => record,
            Err(()) => {
                // Replace whatever is on disk so the next start reads cleanly
                let record = UserPreferenceRecord::new();
                if let Err(e) = Self::persist(path, &record).await {
                    tracing::error!(error = %e, path = %path.display(), "Failed to write empty record");
                }
                record
            }
        }
    }

    /// Copy of the current record
    pub async fn snapshot(&self) -> UserPreferenceRecord {
        self.record.read().await.clone()
    }

    /// Records that a movie was watched, with an optional like/dislike verdict
    ///
    /// A verdict also moves the movie's genre scores by one. The genre lookup
    /// goes to the catalog; if it fails the watch is still recorded and
    /// persisted without touching the scores.
    pub async fn record_watch(
        &self,
        provider: &dyn CatalogProvider,
        directory: &GenreDirectory,
        movie_id: u64,
        liked: Option<bool>,
    ) -> AppResult<WatchReceipt> {
        let genre_names = match liked {
            None => Err(StageOutcome::Skipped),
            Some(_) => match provider.movie_detail(movie_id).await {
                Ok(detail) => Ok(detail
                    .genres
                    .iter()
                    .map(|genre| directory.name_or_id(genre.id))
                    .collect::<Vec<_>>()),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        movie_id = movie_id,
                        "Skipping genre affinity update"
                    );
                    Err(StageOutcome::Failed(e.to_string()))
                }
            },
        };

        // Mutate a copy; the in-memory record only changes once the write succeeds
        let mut guard = self.record.write().await;
        let mut updated = guard.clone();
        updated.mark_watched(movie_id, liked);

        let affinity = match (genre_names, liked) {
            (Ok(names), Some(liked)) => {
                let delta = if liked { 1 } else { -1 };
                for name in &names {
                    updated.adjust_genre(name, delta);
                }
                StageOutcome::from_count(names.len())
            }
            (Ok(_), None) => StageOutcome::Skipped,
            (Err(outcome), _) => outcome,
        };

        Self::persist(&self.path, &updated).await?;
        *guard = updated.clone();

        tracing::info!(
            movie_id = movie_id,
            liked = ?liked,
            watched = updated.watched.len(),
            affinity = ?affinity,
            "Watch recorded"
        );

        Ok(WatchReceipt {
            record: updated,
            affinity,
        })
    }

    /// Replaces the record with an empty one
    pub async fn reset(&self) -> AppResult<()> {
        let mut guard = self.record.write().await;
        let empty = UserPreferenceRecord::new();
        Self::persist(&self.path, &empty).await?;
        *guard = empty;

        tracing::info!(path = %self.path.display(), "Preference record reset");
        Ok(())
    }

    /// Writes the record to a sibling temp file, then renames it into place
    async fn persist(path: &Path, record: &UserPreferenceRecord) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, path).await?;

        tracing::debug!(path = %path.display(), "Preference record persisted");
        Ok(())
    }
}
