// Job Matcher: skill keywords → candidate retrieval → weighted scoring → top N.
// Retrieval happens in the store; ranking happens here, so the store is asked
// for more candidates than will be returned.

pub mod scoring;

use tracing::info;

use crate::errors::AppError;
use crate::jobs::store::JobStore;
use crate::matching::scoring::{rank_candidates, JobMatch};

/// Candidates fetched per requested recommendation.
pub const OVERFETCH_FACTOR: usize = 3;

#[derive(Debug)]
pub enum MatchOutcome {
    /// The keyword list was empty; matching never ran.
    NoSkills,
    /// Ranked recommendations, possibly empty.
    Ranked(Vec<JobMatch>),
}

/// Finds up to `limit` postings for the given normalized keywords.
pub async fn match_jobs(
    store: &dyn JobStore,
    keywords: &[String],
    limit: usize,
) -> Result<MatchOutcome, AppError> {
    if keywords.is_empty() {
        return Ok(MatchOutcome::NoSkills);
    }

    let fetch = (limit * OVERFETCH_FACTOR) as i64;
    let candidates = store.search_candidates(keywords, fetch).await?;
    let ranked = rank_candidates(&candidates, keywords, limit);

    info!(
        "Matched {} of {} candidates for {} keywords",
        ranked.len(),
        candidates.len(),
        keywords.len()
    );

    Ok(MatchOutcome::Ranked(ranked))
}
