use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pkg::internal::{
    adaptors::jobs::spec::JobEntry,
    jobs::{
        FieldError, JobError,
        derive::{formatted_salary, posted_time},
        paginate::Pagination,
    },
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
            error: None,
            errors: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Envelope {
            pagination: Some(pagination),
            ..Envelope::data(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Envelope {
            success: true,
            data: None,
            pagination: None,
            message: Some(message.into()),
            error: None,
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            ..Envelope::message(message)
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            JobError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Envelope::<()> {
                    errors: Some(errors),
                    ..Envelope::failure("Validation failed")
                },
            ),
            JobError::NotFound => (StatusCode::NOT_FOUND, Envelope::failure("Job not found")),
            JobError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Envelope::failure(JobError::RateLimited.to_string()),
            ),
            JobError::Store(detail) => {
                tracing::error!("store failure: {}", &detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::<()> {
                        error: Some("Internal server error".into()),
                        ..Envelope::failure("Server error")
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// A job as presented to clients: the stored record plus the
/// compatibility aliases and read-time fields the frontend expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobEntry,
    pub title: String,
    pub company: String,
    pub posted_time: String,
    pub formatted_salary: String,
}

impl JobView {
    pub fn at(job: JobEntry, now: DateTime<Utc>) -> Self {
        JobView {
            title: job.job_title.clone(),
            company: job.company_name.clone(),
            posted_time: posted_time(job.created_at, now),
            formatted_salary: formatted_salary(job.salary_max),
            job,
        }
    }

    pub fn fresh(job: JobEntry) -> Self {
        JobView {
            posted_time: "Just now".into(),
            ..JobView::at(job, Utc::now())
        }
    }
}

impl From<JobEntry> for JobView {
    fn from(job: JobEntry) -> Self {
        JobView::at(job, Utc::now())
    }
}
