//! Relevance scoring — weighs how strongly a posting mentions a set of keywords.
//!
//! Algorithm, per keyword (all substring tests on lower-cased text):
//! 1. keyword in title    → +3
//! 2. keyword in job_name → +2
//! 3. keyword in description → +1
//!
//! A keyword is "matched" when it occurs in the space-joined
//! `title description job_name` text; only then do its field weights count.
//! Every field that contains the keyword adds its weight. A keyword that only
//! occurs across a field boundary is matched but weighs nothing, so postings
//! are kept only when their total score is positive.

use serde::Serialize;

use crate::models::job::{JobRow, JobSummary};

pub const TITLE_WEIGHT: u32 = 3;
pub const JOB_NAME_WEIGHT: u32 = 2;
pub const DESCRIPTION_WEIGHT: u32 = 1;

/// One ranked recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct JobMatch {
    pub job: JobSummary,
    pub relevance_score: u32,
    pub matched_skills: Vec<String>,
}

/// Score of a single posting against the keyword list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingScore {
    pub relevance_score: u32,
    pub matched_skills: Vec<String>,
}

impl PostingScore {
    pub fn is_match(&self) -> bool {
        self.relevance_score > 0
    }
}

/// Lower-cases and trims every skill; blank entries are dropped, order kept.
pub fn normalize_keywords<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Scores one posting. `keywords` must already be normalized.
pub fn score_posting(job: &JobRow, keywords: &[String]) -> PostingScore {
    let title = job.title.to_lowercase();
    let job_name = job.job_name.as_deref().map(str::to_lowercase);
    let description = job.description.as_deref().map(str::to_lowercase);
    let combined = format!(
        "{} {} {}",
        title,
        description.as_deref().unwrap_or_default(),
        job_name.as_deref().unwrap_or_default()
    );

    let mut relevance_score = 0;
    let mut matched_skills = Vec::new();

    for keyword in keywords {
        if !combined.contains(keyword.as_str()) {
            continue;
        }
        matched_skills.push(keyword.clone());

        let mut weight = 0;
        if title.contains(keyword.as_str()) {
            weight += TITLE_WEIGHT;
        }
        if job_name.as_deref().is_some_and(|t| t.contains(keyword.as_str())) {
            weight += JOB_NAME_WEIGHT;
        }
        if description
            .as_deref()
            .is_some_and(|t| t.contains(keyword.as_str()))
        {
            weight += DESCRIPTION_WEIGHT;
        }

        relevance_score += weight;
    }

    PostingScore {
        relevance_score,
        matched_skills,
    }
}

/// Scores every candidate, drops zero-score postings, sorts by score (stable, so ties
/// keep the store's order) and keeps the first `limit`.
pub fn rank_candidates(candidates: &[JobRow], keywords: &[String], limit: usize) -> Vec<JobMatch> {
    let mut matches: Vec<JobMatch> = candidates
        .iter()
        .filter_map(|job| {
            let score = score_posting(job, keywords);
            score.is_match().then(|| JobMatch {
                job: JobSummary::from(job),
                relevance_score: score.relevance_score,
                matched_skills: score.matched_skills,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    matches.truncate(limit);
    matches
}
