//! In-memory doubles for the store and the model, used by unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::errors::AppError;
use crate::jobs::store::{JobFilter, JobPage, JobStore};
use crate::llm_client::{CompletionModel, LlmError};
use crate::models::job::{JobRow, NewJob};

#[derive(Default)]
struct Inner {
    jobs: Vec<JobRow>,
    next_id: i32,
    search_calls: usize,
    last_search_limit: Option<i64>,
}

/// A `JobStore` over a `Vec`. Newer rows get later `created_at` values.
#[derive(Default)]
pub struct MemoryJobStore {
    inner: Mutex<Inner>,
    /// Any insert whose title equals this fails like a constraint violation.
    fail_on_title: Option<String>,
}

impl MemoryJobStore {
    pub fn with_jobs(jobs: Vec<NewJob>) -> Self {
        let store = Self::default();
        {
            let mut inner = store.inner.lock().unwrap();
            for job in &jobs {
                let row = make_row(&mut inner, job);
                inner.jobs.push(row);
            }
        }
        store
    }

    pub fn failing_on(title: &str) -> Self {
        Self {
            fail_on_title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().jobs.len()
    }

    pub fn search_calls(&self) -> usize {
        self.inner.lock().unwrap().search_calls
    }

    pub fn last_search_limit(&self) -> Option<i64> {
        self.inner.lock().unwrap().last_search_limit
    }

    fn check(&self, job: &NewJob) -> Result<(), AppError> {
        if self.fail_on_title.as_deref() == Some(job.title.as_str()) {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "rejected row '{}'",
                job.title
            ))));
        }
        Ok(())
    }
}

fn make_row(inner: &mut Inner, job: &NewJob) -> JobRow {
    inner.next_id += 1;
    let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        + Duration::seconds(i64::from(inner.next_id));
    JobRow {
        id: inner.next_id,
        job_name: job.job_name.clone(),
        title: job.title.clone(),
        link: job.link.clone(),
        description: job.description.clone(),
        experience_level: job.experience_level.clone(),
        location: job.location.clone(),
        company: job.company.clone(),
        salary_range: job.salary_range.clone(),
        job_type: job.job_type.clone(),
        remote_option: job.remote_option.clone(),
        created_at,
        updated_at: created_at,
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn newest_first(jobs: &[JobRow]) -> Vec<JobRow> {
    let mut sorted = jobs.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    sorted
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: &NewJob) -> Result<JobRow, AppError> {
        self.check(job)?;
        let mut inner = self.inner.lock().unwrap();
        let row = make_row(&mut inner, job);
        inner.jobs.push(row.clone());
        Ok(row)
    }

    /// Writes row by row; a failure truncates back to the pre-batch rows. Ids
    /// already handed out stay consumed, like a sequence.
    async fn insert_many(&self, jobs: &[NewJob]) -> Result<usize, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let savepoint = inner.jobs.len();
        for job in jobs {
            if let Err(e) = self.check(job) {
                inner.jobs.truncate(savepoint);
                return Err(e);
            }
            let row = make_row(&mut inner, job);
            inner.jobs.push(row);
        }
        Ok(jobs.len())
    }

    async fn list(&self, filter: &JobFilter) -> Result<JobPage, AppError> {
        let inner = self.inner.lock().unwrap();
        let filtered: Vec<JobRow> = newest_first(&inner.jobs)
            .into_iter()
            .filter(|j| {
                filter
                    .company
                    .as_deref()
                    .map_or(true, |c| contains_ci(j.company.as_deref(), c))
            })
            .filter(|j| {
                filter
                    .location
                    .as_deref()
                    .map_or(true, |l| contains_ci(j.location.as_deref(), l))
            })
            .collect();

        Ok(JobPage {
            total: filtered.len() as i64,
            jobs: filtered
                .into_iter()
                .skip(filter.skip as usize)
                .take(filter.limit as usize)
                .collect(),
        })
    }

    async fn get(&self, id: i32) -> Result<Option<JobRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.jobs.len();
        inner.jobs.retain(|j| j.id != id);
        Ok(inner.jobs.len() < before)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.inner.lock().unwrap().jobs.len() as i64)
    }

    async fn search_candidates(
        &self,
        keywords: &[String],
        limit: i64,
    ) -> Result<Vec<JobRow>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.search_calls += 1;
        inner.last_search_limit = Some(limit);

        Ok(newest_first(&inner.jobs)
            .into_iter()
            .filter(|j| {
                keywords.iter().any(|k| {
                    contains_ci(Some(j.title.as_str()), k)
                        || contains_ci(j.description.as_deref(), k)
                        || contains_ci(j.job_name.as_deref(), k)
                })
            })
            .take(limit as usize)
            .collect())
    }
}

/// A `CompletionModel` that replays a fixed reply (or a fixed failure).
pub struct ScriptedModel {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(vec![]),
        }
    }

    /// Every call fails with an API error carrying `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "model unavailable".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_failed_batch_undoes_rows_already_written() {
        let store = MemoryJobStore::failing_on("Broken");
        let kept = store.insert(&job("Existing")).await.unwrap();

        let err = store
            .insert_many(&[job("First"), job("Second"), job("Broken"), job("Last")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(kept.id).await.unwrap().unwrap().title, "Existing");

        // First and Second were written before the failure and burned ids 2 and 3.
        let next = store.insert(&job("After")).await.unwrap();
        assert_eq!(next.id, 4);
    }
}
