use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Covers both absent records and ids that do not parse.
    #[error("Job not found")]
    NotFound,

    #[error("Too many requests from this IP, please try again later.")]
    RateLimited,

    #[error("store error: {0}")]
    Store(String),
}

impl JobError {
    pub fn invalid(field: &str, message: &str) -> Self {
        JobError::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<sqlx::Error> for JobError {
    fn from(e: sqlx::Error) -> Self {
        JobError::Store(e.to_string())
    }
}

pub type Result<T> = core::result::Result<T, JobError>;
