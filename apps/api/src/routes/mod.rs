pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/stats", get(health::stats_handler))
        // CV processing
        .route("/upload-cv", post(cv::handle_upload_cv))
        // Job management
        .route(
            "/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/jobs/bulk", post(jobs::handle_create_jobs_bulk))
        .route(
            "/jobs/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
