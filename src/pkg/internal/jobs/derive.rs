use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::input::NewJob;
use crate::pkg::internal::adaptors::jobs::spec::{DEFAULT_EXPERIENCE, JobEntry, NEGOTIABLE};

pub const MAX_DERIVED_BULLETS: usize = 5;

const LAKH: f64 = 100_000.0;
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Builds the record to persist for a validated create request.
///
/// Applies the create-time derivation rules: a missing bullet list is cut
/// from the non-blank lines of `jobDescription`, and a missing `salary` is
/// rendered from `salaryMax`. Later updates never re-run these.
pub fn prepare_for_create(input: NewJob, id: Uuid, now: DateTime<Utc>) -> JobEntry {
    let description = if input.description.is_empty() {
        bullets_from(&input.job_description)
    } else {
        input.description
    };
    let salary = match input.salary {
        Some(salary) => salary,
        None => formatted_salary(input.salary_max),
    };

    JobEntry {
        id,
        job_title: input.job_title,
        company_name: input.company_name,
        company_logo: input.company_logo,
        location: input.location,
        job_type: input.job_type,
        experience: input
            .experience
            .unwrap_or_else(|| DEFAULT_EXPERIENCE.to_string()),
        salary_min: input.salary_min,
        salary_max: input.salary_max,
        salary,
        application_deadline: input.application_deadline,
        job_description: input.job_description,
        description,
        is_draft: input.is_draft.unwrap_or(false),
        is_active: input.is_active.unwrap_or(true),
        posted_by: input.posted_by,
        applicants: input.applicants,
        views: 0,
        created_at: now,
        updated_at: now,
    }
}

/// First five non-blank lines of a free-text description, in order.
pub fn bullets_from(job_description: &str) -> Vec<String> {
    job_description
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(MAX_DERIVED_BULLETS)
        .map(str::to_string)
        .collect()
}

/// `12LPA` for a ceiling of 1_200_000, `Negotiable` without one.
pub fn formatted_salary(salary_max: Option<f64>) -> String {
    match salary_max {
        Some(max) if max > 0.0 => format!("{}LPA", (max / LAKH).floor() as i64),
        _ => NEGOTIABLE.to_string(),
    }
}

pub fn posted_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - created_at).num_milliseconds().abs();
    // partial days round up
    let days = (elapsed_ms + DAY_MS - 1) / DAY_MS;
    match days {
        1 => "24h Ago".to_string(),
        d if d < 7 => format!("{}d Ago", d),
        d if d < 30 => format!("{}w Ago", d / 7),
        d => format!("{}m Ago", d / 30),
    }
}
