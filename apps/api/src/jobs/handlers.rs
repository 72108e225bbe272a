//! Axum route handlers for job-posting administration.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::store::JobFilter;
use crate::jobs::validation::{validate_batch, validate_new_job};
use crate::models::job::{JobRow, NewJob};
use crate::state::AppState;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_page_size")]
    pub limit: i64,
    pub company: Option<String>,
    pub location: Option<String>,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Serialize)]
pub struct ListJobsResponse {
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub jobs: Vec<JobRow>,
}

#[derive(Debug, Serialize)]
pub struct BulkCreateResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    body: Result<Json<NewJob>, JsonRejection>,
) -> Result<Json<JobRow>, AppError> {
    let Json(job) = body?;
    validate_new_job(&job).map_err(AppError::Validation)?;

    let row = state.store.insert(&job).await?;
    info!("Created job {} ({})", row.id, row.title);
    Ok(Json(row))
}

/// POST /jobs/bulk
///
/// All-or-nothing: one bad record rejects the whole batch.
pub async fn handle_create_jobs_bulk(
    State(state): State<AppState>,
    body: Result<Json<Vec<NewJob>>, JsonRejection>,
) -> Result<Json<BulkCreateResponse>, AppError> {
    let Json(jobs) = body?;
    validate_batch(&jobs)?;

    let count = state.store.insert_many(&jobs).await?;
    Ok(Json(BulkCreateResponse {
        success: true,
        message: format!("Successfully created {count} jobs"),
        count,
    }))
}

/// GET /jobs?skip&limit&company&location
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    query: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<Json<ListJobsResponse>, AppError> {
    let Query(params) = query?;
    if params.skip < 0 {
        return Err(AppError::Validation("skip must be >= 0".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&params.limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let filter = JobFilter {
        company: params.company.filter(|c| !c.is_empty()),
        location: params.location.filter(|l| !l.is_empty()),
        skip: params.skip,
        limit: params.limit,
    };
    let page = state.store.list(&filter).await?;

    Ok(Json(ListJobsResponse {
        total: page.total,
        skip: filter.skip,
        limit: filter.limit,
        jobs: page.jobs,
    }))
}

/// GET /jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<JobRow>, AppError> {
    let job = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job))
}

/// DELETE /jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    if !state.store.delete(id).await? {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    info!("Deleted job {id}");
    Ok(Json(json!({
        "success": true,
        "message": format!("Job {id} deleted successfully")
    })))
}
