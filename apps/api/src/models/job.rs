use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Longest description (in characters) returned inside a recommendation.
pub const SUMMARY_DESCRIPTION_CHARS: usize = 250;
const ELLIPSIS: &str = "...";

/// A job posting as stored in the `jobs` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i32,
    pub job_name: Option<String>,
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub experience_level: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub salary_range: Option<String>,
    pub job_type: Option<String>,
    pub remote_option: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /jobs` and one element of `POST /jobs/bulk`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub job_name: Option<String>,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub remote_option: Option<String>,
}

/// The slice of a posting shown next to a recommendation.
/// `job_name` and timestamps are deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub remote_option: Option<String>,
    pub salary_range: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl From<&JobRow> for JobSummary {
    fn from(job: &JobRow) -> Self {
        JobSummary {
            id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            experience_level: job.experience_level.clone(),
            job_type: job.job_type.clone(),
            remote_option: job.remote_option.clone(),
            salary_range: job.salary_range.clone(),
            link: job.link.clone(),
            description: job.description.as_deref().map(truncate_description),
        }
    }
}

/// Cuts a description to `SUMMARY_DESCRIPTION_CHARS` characters plus `"..."`.
/// Shorter text is returned unchanged.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
