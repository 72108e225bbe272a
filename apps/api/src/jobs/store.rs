//! Job Store — the `JobStore` trait and its PostgreSQL backend.
//!
//! `AppState` holds an `Arc<dyn JobStore>`. Every `PgJobStore` operation checks
//! a connection (or a transaction) out of the pool for its own duration; the
//! guard returns it on every exit path, and an uncommitted transaction rolls
//! back when dropped.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::{JobRow, NewJob};

/// Optional filters and pagination for `GET /jobs`.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub company: Option<String>,
    pub location: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

/// One page of postings plus the total matching the filters.
#[derive(Debug, Clone, Serialize)]
pub struct JobPage {
    pub total: i64,
    pub jobs: Vec<JobRow>,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, job: &NewJob) -> Result<JobRow, AppError>;

    /// Inserts every job or none of them.
    async fn insert_many(&self, jobs: &[NewJob]) -> Result<usize, AppError>;

    async fn list(&self, filter: &JobFilter) -> Result<JobPage, AppError>;

    async fn get(&self, id: i32) -> Result<Option<JobRow>, AppError>;

    /// Returns `false` when no posting had this id.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Postings where any keyword is a case-insensitive substring of the
    /// title, description or job name; newest first, at most `limit`.
    async fn search_candidates(
        &self,
        keywords: &[String],
        limit: i64,
    ) -> Result<Vec<JobRow>, AppError>;
}

/// Builds an `ILIKE` pattern that matches `needle` as a plain substring.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

const INSERT_JOB: &str = r#"
    INSERT INTO jobs
        (job_name, title, link, description, experience_level,
         location, company, salary_range, job_type, remote_option)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    RETURNING *
"#;

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_one<'e, E>(executor: E, job: &NewJob) -> Result<JobRow, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, JobRow>(INSERT_JOB)
        .bind(&job.job_name)
        .bind(&job.title)
        .bind(&job.link)
        .bind(&job.description)
        .bind(&job.experience_level)
        .bind(&job.location)
        .bind(&job.company)
        .bind(&job.salary_range)
        .bind(&job.job_type)
        .bind(&job.remote_option)
        .fetch_one(executor)
        .await
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: &NewJob) -> Result<JobRow, AppError> {
        let row = insert_one(&self.pool, job).await?;
        Ok(row)
    }

    async fn insert_many(&self, jobs: &[NewJob]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        for job in jobs {
            insert_one(&mut *tx, job).await?;
        }
        tx.commit().await?;

        info!("Bulk inserted {} jobs", jobs.len());
        Ok(jobs.len())
    }

    async fn list(&self, filter: &JobFilter) -> Result<JobPage, AppError> {
        let company = filter.company.as_deref().map(contains_pattern);
        let location = filter.location.as_deref().map(contains_pattern);

        let mut conn = self.pool.acquire().await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM jobs
            WHERE ($1::text IS NULL OR company ILIKE $1)
              AND ($2::text IS NULL OR location ILIKE $2)
            "#,
        )
        .bind(&company)
        .bind(&location)
        .fetch_one(&mut *conn)
        .await?;

        let jobs = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::text IS NULL OR company ILIKE $1)
              AND ($2::text IS NULL OR location ILIKE $2)
            ORDER BY created_at DESC, id DESC
            OFFSET $3
            LIMIT $4
            "#,
        )
        .bind(&company)
        .bind(&location)
        .bind(filter.skip)
        .bind(filter.limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(JobPage { total, jobs })
    }

    async fn get(&self, id: i32) -> Result<Option<JobRow>, AppError> {
        let job = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn search_candidates(
        &self,
        keywords: &[String],
        limit: i64,
    ) -> Result<Vec<JobRow>, AppError> {
        if keywords.is_empty() {
            return Ok(vec![]);
        }
        let patterns: Vec<String> = keywords.iter().map(|k| contains_pattern(k)).collect();

        let jobs = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT * FROM jobs
            WHERE title ILIKE ANY($1)
               OR description ILIKE ANY($1)
               OR job_name ILIKE ANY($1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(&patterns)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }
}
