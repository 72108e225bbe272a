//! Axum route handler for the CV upload flow:
//! PDF → text → model review → keyword matching → ranked jobs.

use axum::{
    extract::{rejection::QueryRejection, Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::extractor::{analyze_cv, ProfileAnalysis};
use crate::cv::pdf::extract_text;
use crate::errors::AppError;
use crate::matching::scoring::{normalize_keywords, JobMatch};
use crate::matching::{match_jobs, MatchOutcome};
use crate::state::AppState;

pub const DEFAULT_RECOMMENDATIONS: u32 = 10;
pub const MAX_RECOMMENDATIONS: u32 = 50;
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_RECOMMENDATIONS
}

#[derive(Debug, Serialize)]
pub struct CvReview {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub experience_level: String,
    pub extracted_skills: Vec<String>,
}

impl From<ProfileAnalysis> for CvReview {
    fn from(analysis: ProfileAnalysis) -> Self {
        CvReview {
            summary: analysis.summary,
            strengths: analysis.strengths,
            improvements: analysis.improvements,
            experience_level: analysis.experience_level,
            extracted_skills: analysis.skills,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobRecommendations {
    pub total_matches: usize,
    pub jobs: Vec<JobMatch>,
}

/// Two shapes: ranked recommendations, or the "no skills" answer that skips
/// matching altogether.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Matched {
        success: bool,
        cv_review: CvReview,
        job_recommendations: JobRecommendations,
        message: String,
    },
    NoSkills {
        cv_review: ProfileAnalysis,
        matching_jobs: Vec<JobMatch>,
        message: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload-cv?limit=N
///
/// Multipart upload with a `file` field holding a PDF.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let Query(params) = query?;
    if !(1..=MAX_RECOMMENDATIONS).contains(&params.limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_RECOMMENDATIONS}"
        )));
    }

    let (file_name, data) = read_pdf_upload(multipart).await?;
    info!("Processing CV upload '{}' ({} bytes)", file_name, data.len());

    let cv_text = extract_text(data).await?;
    let response = review_and_match(&state, &cv_text, params.limit as usize).await?;

    Ok(Json(response))
}

/// Everything after text extraction: model review, then matching.
pub async fn review_and_match(
    state: &AppState,
    cv_text: &str,
    limit: usize,
) -> Result<UploadResponse, AppError> {
    let analysis = analyze_cv(state.llm.as_ref(), cv_text).await?.into_analysis();
    let keywords = normalize_keywords(&analysis.skills);

    let response = match match_jobs(state.store.as_ref(), &keywords, limit).await? {
        MatchOutcome::NoSkills => {
            info!("No skills extracted from CV; skipping job matching");
            UploadResponse::NoSkills {
                cv_review: analysis,
                matching_jobs: vec![],
                message: "No skills extracted - unable to match jobs".to_string(),
            }
        }
        MatchOutcome::Ranked(jobs) => UploadResponse::Matched {
            success: true,
            message: format!("Found {} matching jobs for your profile!", jobs.len()),
            cv_review: CvReview::from(analysis),
            job_recommendations: JobRecommendations {
                total_matches: jobs.len(),
                jobs,
            },
        },
    };

    Ok(response)
}

/// Reads the `file` field. The name is checked before the body is buffered.
async fn read_pdf_upload(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.ends_with(".pdf") {
            return Err(AppError::Validation(
                "Only PDF files are supported".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok((file_name, data));
    }

    Err(AppError::Validation(format!(
        "Missing '{FILE_FIELD}' field in multipart body"
    )))
}
