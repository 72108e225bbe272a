use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

const SERVICE_NAME: &str = "Simple CV Upload & Job Match API";

/// GET /
/// Service information and a map of the available endpoints.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "main_endpoint": "/upload-cv (POST with PDF file)",
        "job_management": {
            "create_job": "POST /jobs",
            "bulk_create": "POST /jobs/bulk",
            "list_jobs": "GET /jobs",
            "get_job": "GET /jobs/{job_id}",
            "delete_job": "DELETE /jobs/{job_id}"
        },
        "description": "Upload your CV PDF and instantly get review + job recommendations"
    }))
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "cv-job-match-api",
        "timestamp": Utc::now()
    }))
}

/// GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let total_jobs = state.store.count().await?;
    Ok(Json(json!({
        "total_jobs": total_jobs,
        "service": "ready",
        "last_updated": Utc::now()
    })))
}
