use crate::errors::AppError;
use crate::models::job::NewJob;

/// Column widths of the `jobs` table. Anything longer would be rejected by
/// PostgreSQL mid-write, so it is rejected up front instead.
const SHORT_TEXT: usize = 255;
const LINK_TEXT: usize = 500;
const LABEL_TEXT: usize = 100;
const TAG_TEXT: usize = 50;

/// Validates a single posting before it reaches the store.
///
/// FAIL conditions:
/// - `title` is blank
/// - any field is longer than its column
pub fn validate_new_job(job: &NewJob) -> Result<(), String> {
    if job.title.trim().is_empty() {
        return Err("title cannot be empty".to_string());
    }

    let fields: [(&str, Option<&str>, usize); 10] = [
        ("title", Some(job.title.as_str()), SHORT_TEXT),
        ("job_name", job.job_name.as_deref(), SHORT_TEXT),
        ("link", job.link.as_deref(), LINK_TEXT),
        ("experience_level", job.experience_level.as_deref(), LABEL_TEXT),
        ("location", job.location.as_deref(), SHORT_TEXT),
        ("company", job.company.as_deref(), SHORT_TEXT),
        ("salary_range", job.salary_range.as_deref(), LABEL_TEXT),
        ("job_type", job.job_type.as_deref(), TAG_TEXT),
        ("remote_option", job.remote_option.as_deref(), TAG_TEXT),
        ("description", job.description.as_deref(), usize::MAX),
    ];

    for (name, value, max) in fields {
        if let Some(value) = value {
            let len = value.chars().count();
            if len > max {
                return Err(format!("{name} must be at most {max} characters (got {len})"));
            }
        }
    }

    Ok(())
}

/// Validates a whole batch. The first bad record rejects everything and is
/// reported by its position.
pub fn validate_batch(jobs: &[NewJob]) -> Result<(), AppError> {
    for (index, job) in jobs.iter().enumerate() {
        validate_new_job(job)
            .map_err(|reason| AppError::Validation(format!("job[{index}]: {reason}")))?;
    }
    Ok(())
}
