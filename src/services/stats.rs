use chrono::NaiveDate;

use crate::{
    models::{ExportedStats, FavoriteGenre, UserPreferenceRecord, ViewingStats, WatchedMovie},
    services::providers::CatalogProvider,
};

/// How many favorite genres the stats view lists
const FAVORITE_GENRE_LIMIT: usize = 5;

/// Summary of the user's viewing history
///
/// Counts and favorite genres come straight from the record. The last
/// `recent_window` watches are looked up in the catalog one by one for their
/// title and poster; a failed lookup drops that entry only.
pub async fn viewing_stats(
    provider: &dyn CatalogProvider,
    record: &UserPreferenceRecord,
    recent_window: usize,
) -> ViewingStats {
    let favorite_genres = record
        .ranked_genres()
        .into_iter()
        .filter(|(_, score)| *score > 0)
        .take(FAVORITE_GENRE_LIMIT)
        .map(|(name, score)| FavoriteGenre {
            name: name.to_string(),
            score,
        })
        .collect();

    let mut watched_movies = Vec::new();
    for &movie_id in record.recent_watches(recent_window) {
        match provider.movie_detail(movie_id).await {
            Ok(detail) => watched_movies.push(WatchedMovie {
                id: movie_id,
                title: detail.summary.title,
                poster_path: detail.summary.poster_path,
                status: record.status_of(movie_id),
                date: detail.summary.release_date,
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    movie_id = movie_id,
                    "Skipping watched movie in stats"
                );
            }
        }
    }

    ViewingStats {
        total_watched: record.watched.len(),
        total_liked: record.liked.len(),
        total_disliked: record.disliked.len(),
        favorite_genres,
        watched_movies,
    }
}

/// Viewing statistics stamped with the export date
pub async fn export_stats(
    provider: &dyn CatalogProvider,
    record: &UserPreferenceRecord,
    recent_window: usize,
    export_date: NaiveDate,
) -> ExportedStats {
    let stats = viewing_stats(provider, record, recent_window).await;

    tracing::info!(
        export_date = %export_date,
        total_watched = stats.total_watched,
        "Viewing data exported"
    );

    ExportedStats { export_date, stats }
}
