use crate::{
    models::{Candidate, DurationBucket, MovieSummary, StageOutcome},
    services::providers::CatalogProvider,
};

/// Result of a duration filter pass
#[derive(Debug, Clone, PartialEq)]
pub struct FilterReport {
    /// Matches in the order they were found
    pub candidates: Vec<Candidate>,
    /// Detail lookups attempted
    pub examined: usize,
    /// Detail lookups that failed
    pub failed: usize,
}

impl FilterReport {
    fn unfiltered(candidates: Vec<MovieSummary>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Candidate::from).collect(),
            examined: 0,
            failed: 0,
        }
    }

    pub fn outcome(&self, duration: Option<DurationBucket>) -> StageOutcome {
        if duration.is_none() {
            StageOutcome::Skipped
        } else if self.candidates.is_empty() && self.failed > 0 && self.failed == self.examined {
            StageOutcome::Failed(format!("{} detail lookups failed", self.failed))
        } else {
            StageOutcome::from_count(self.candidates.len())
        }
    }
}

/// Keeps the candidates whose runtime falls in the duration bucket
///
/// Runtime is only known from the detail record, so each candidate costs one
/// catalog call, made one after another. Collection stops as soon as
/// `match_cap` matches are found. Without a bucket the input comes back as is
/// and nothing is fetched.
pub async fn filter_by_duration(
    provider: &dyn CatalogProvider,
    candidates: Vec<MovieSummary>,
    duration: Option<DurationBucket>,
    match_cap: usize,
) -> FilterReport {
    let Some(bucket) = duration else {
        return FilterReport::unfiltered(candidates);
    };

    let mut report = FilterReport {
        candidates: Vec::new(),
        examined: 0,
        failed: 0,
    };

    for movie in candidates {
        if report.candidates.len() >= match_cap {
            break;
        }
        report.examined += 1;

        // Runtime is only on the detail record
        match provider.movie_detail(movie.id).await {
            Ok(detail) => {
                if bucket.contains(detail.runtime) {
                    report.candidates.push(Candidate::Detailed(detail));
                }
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    error = %e,
                    movie_id = movie.id,
                    "Detail lookup failed, skipping candidate"
                );
            }
        }
    }

    tracing::debug!(
        duration = %bucket,
        examined = report.examined,
        matched = report.candidates.len(),
        failed = report.failed,
        "Duration filter applied"
    );

    report
}
