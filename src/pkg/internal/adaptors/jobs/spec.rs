use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

pub const DEFAULT_EXPERIENCE: &str = "1-3 yr Exp";
pub const NEGOTIABLE: &str = "Negotiable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "job_type")]
pub enum JobType {
    #[serde(rename = "Full Time")]
    #[sqlx(rename = "Full Time")]
    FullTime,
    #[serde(rename = "Part Time")]
    #[sqlx(rename = "Part Time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Freelance,
        JobType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full Time",
            JobType::PartTime => "Part Time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
            JobType::Internship => "Internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the display name, ignoring case, spaces and hyphens
/// ("full-time", "FullTime" and "Full Time" are the same type).
impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        JobType::ALL
            .into_iter()
            .find(|t| t.as_str().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| format!("'{}' is not a valid job type", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl FromStr for ApplicantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicantStatus::Pending),
            "reviewed" => Ok(ApplicantStatus::Reviewed),
            "accepted" => Ok(ApplicantStatus::Accepted),
            "rejected" => Ok(ApplicantStatus::Rejected),
            _ => Err(format!("'{}' is not a valid applicant status", s.trim())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub user: Uuid,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ApplicantStatus,
}

/// A job posting as persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
    pub id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub experience: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary: String,
    pub application_deadline: Option<DateTime<Utc>>,
    pub job_description: String,
    pub description: Vec<String>,
    pub is_draft: bool,
    pub is_active: bool,
    pub posted_by: Option<Uuid>,
    #[sqlx(json)]
    pub applicants: Vec<Applicant>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobEntry {
    /// Only active, published jobs show up in public listings.
    pub fn is_listed(&self) -> bool {
        self.is_active && !self.is_draft
    }
}
