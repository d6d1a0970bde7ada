use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::error::{FieldError, JobError, Result};
use super::listing::ListingConfig;
use super::paginate::{PageRequest, SortOrder};
use super::query::JobFilter;
use crate::pkg::internal::adaptors::jobs::spec::{Applicant, ApplicantStatus, JobEntry, JobType};

/// A number that may arrive as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn value(&self) -> Option<core::result::Result<f64, ()>> {
        match self {
            Numeric::Number(n) => Some(Ok(*n)),
            Numeric::Text(s) if s.trim().is_empty() => None,
            Numeric::Text(s) => Some(s.trim().parse::<f64>().map_err(|_| ())),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantInput {
    pub user: Option<String>,
    pub applied_at: Option<String>,
    pub status: Option<String>,
}

/// Job fields as sent by a client, for both create and update.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    #[validate(length(min = 1, max = 100, message = "Job title must be between 1 and 100 characters"))]
    pub job_title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Company name must be between 1 and 100 characters"))]
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    #[validate(length(min = 1, message = "Location cannot be empty"))]
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience: Option<String>,
    pub salary_min: Option<Numeric>,
    pub salary_max: Option<Numeric>,
    pub salary: Option<String>,
    pub application_deadline: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Job description must be between 1 and 2000 characters"))]
    pub job_description: Option<String>,
    pub description: Option<Vec<String>>,
    pub is_draft: Option<bool>,
    pub is_active: Option<bool>,
    pub posted_by: Option<String>,
    pub applicants: Option<Vec<ApplicantInput>>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_title: String,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub experience: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub job_description: String,
    pub description: Vec<String>,
    pub is_draft: Option<bool>,
    pub is_active: Option<bool>,
    pub posted_by: Option<Uuid>,
    pub applicants: Vec<Applicant>,
}

/// An update request that passed validation. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary: Option<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub job_description: Option<String>,
    pub description: Option<Vec<String>>,
    pub is_draft: Option<bool>,
    pub is_active: Option<bool>,
    pub posted_by: Option<Uuid>,
    pub applicants: Option<Vec<Applicant>>,
}

struct Typed {
    job_type: Option<JobType>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    application_deadline: Option<DateTime<Utc>>,
    posted_by: Option<Uuid>,
    applicants: Option<Vec<Applicant>>,
}

impl JobInput {
    fn normalized(mut self) -> Self {
        for field in [
            &mut self.job_title,
            &mut self.company_name,
            &mut self.location,
            &mut self.job_type,
            &mut self.job_description,
        ] {
            if let Some(value) = field.as_mut() {
                *value = value.trim().to_string();
            }
        }
        self
    }

    fn check(&self, errors: &mut Vec<FieldError>) -> Typed {
        if let Err(e) = self.validate() {
            errors.extend(field_errors(&e));
        }
        let job_type = self.job_type.as_deref().and_then(|raw| match raw.parse::<JobType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push(FieldError::new("jobType", "Invalid job type"));
                None
            }
        });
        Typed {
            job_type,
            salary_min: salary(&self.salary_min, "salaryMin", "Minimum salary", errors),
            salary_max: salary(&self.salary_max, "salaryMax", "Maximum salary", errors),
            application_deadline: self
                .application_deadline
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .and_then(|raw| match parse_date(raw) {
                    Some(d) => Some(d),
                    None => {
                        errors.push(FieldError::new("applicationDeadline", "Invalid date format"));
                        None
                    }
                }),
            posted_by: self
                .posted_by
                .as_deref()
                .and_then(|raw| match Uuid::parse_str(raw.trim()) {
                    Ok(id) => Some(id),
                    Err(_) => {
                        errors.push(FieldError::new("postedBy", "Invalid user id"));
                        None
                    }
                }),
            applicants: self
                .applicants
                .as_deref()
                .and_then(|raw| applicants(raw, Utc::now(), errors)),
        }
    }

    pub fn into_new_job(self) -> Result<NewJob> {
        let input = self.normalized();
        let mut errors = vec![];
        for (field, value, message) in [
            ("jobTitle", &input.job_title, "Job title is required"),
            ("companyName", &input.company_name, "Company name is required"),
            ("location", &input.location, "Location is required"),
            ("jobType", &input.job_type, "Job type is required"),
            ("jobDescription", &input.job_description, "Job description is required"),
        ] {
            if value.as_deref().is_none_or(str::is_empty) {
                errors.push(FieldError::new(field, message));
            }
        }
        let typed = input.check(&mut errors);
        if !errors.is_empty() {
            return Err(rejected(errors));
        }

        Ok(NewJob {
            job_title: input.job_title.unwrap_or_default(),
            company_name: input.company_name.unwrap_or_default(),
            company_logo: input.company_logo,
            location: input.location.unwrap_or_default(),
            job_type: typed.job_type.unwrap_or(JobType::FullTime),
            experience: input.experience,
            salary_min: typed.salary_min,
            salary_max: typed.salary_max,
            salary: input.salary.filter(|s| !s.trim().is_empty()),
            application_deadline: typed.application_deadline,
            job_description: input.job_description.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            is_draft: input.is_draft,
            is_active: input.is_active,
            posted_by: typed.posted_by,
            applicants: typed.applicants.unwrap_or_default(),
        })
    }

    pub fn into_patch(self) -> Result<JobPatch> {
        let input = self.normalized();
        let mut errors = vec![];
        let typed = input.check(&mut errors);
        if !errors.is_empty() {
            return Err(rejected(errors));
        }

        Ok(JobPatch {
            job_title: input.job_title,
            company_name: input.company_name,
            company_logo: input.company_logo,
            location: input.location,
            job_type: typed.job_type,
            experience: input.experience,
            salary_min: typed.salary_min,
            salary_max: typed.salary_max,
            salary: input.salary.filter(|s| !s.trim().is_empty()),
            application_deadline: typed.application_deadline,
            job_description: input.job_description,
            description: input.description,
            is_draft: input.is_draft,
            is_active: input.is_active,
            posted_by: typed.posted_by,
            applicants: typed.applicants,
        })
    }
}

impl JobPatch {
    /// Overwrites the fields present in the patch. Create-time derivations
    /// are left alone even if their source fields change.
    pub fn apply(self, job: &mut JobEntry, now: DateTime<Utc>) {
        let patch = self;
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field { job.$field = v; })*
            };
        }
        macro_rules! set_opt {
            ($($field:ident),*) => {
                $(if let Some(v) = patch.$field { job.$field = Some(v); })*
            };
        }
        set!(
            job_title,
            company_name,
            location,
            job_type,
            experience,
            salary,
            job_description,
            description,
            is_draft,
            is_active,
            applicants
        );
        set_opt!(
            company_logo,
            salary_min,
            salary_max,
            application_deadline,
            posted_by
        );
        job.updated_at = now;
    }
}

/// Query string of the listing endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<String>,
    pub salary_max: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub filter: JobFilter,
    pub page: PageRequest,
    pub sort: SortOrder,
}

impl ListParams {
    pub fn into_request(self, config: &ListingConfig) -> Result<ListRequest> {
        let mut errors = vec![];
        let present = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };

        let page = match present(self.page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(p) if p >= 1 => p,
                _ => {
                    errors.push(FieldError::new("page", "Page must be a positive integer"));
                    1
                }
            },
        };
        let limit = match present(self.limit) {
            None => config.default_limit,
            Some(raw) => match raw.parse::<u32>() {
                Ok(l) if (1..=config.max_limit).contains(&l) => l,
                _ => {
                    errors.push(FieldError::new(
                        "limit",
                        format!("Limit must be between 1 and {}", config.max_limit),
                    ));
                    config.default_limit
                }
            },
        };
        let mut number = |v: Option<String>, field: &str, label: &str| {
            present(v).and_then(|raw| match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                _ => {
                    errors.push(FieldError::new(field, format!("{} must be a number", label)));
                    None
                }
            })
        };
        let salary_min = number(self.salary_min, "salaryMin", "Minimum salary");
        let salary_max = number(self.salary_max, "salaryMax", "Maximum salary");
        // filters compare the stored display name exactly
        let job_type = present(self.job_type).and_then(|raw| {
            let found = JobType::ALL.into_iter().find(|t| t.as_str() == raw);
            if found.is_none() {
                errors.push(FieldError::new("jobType", "Invalid job type"));
            }
            found
        });
        let sort = match present(self.sort_by) {
            None => SortOrder::default(),
            Some(raw) => raw.parse::<SortOrder>().unwrap_or_else(|msg| {
                errors.push(FieldError::new("sortBy", msg));
                SortOrder::default()
            }),
        };
        if !errors.is_empty() {
            return Err(rejected(errors));
        }

        Ok(ListRequest {
            filter: JobFilter {
                search: present(self.search),
                location: present(self.location),
                job_type,
                salary_min,
                salary_max,
            },
            page: PageRequest { page, limit },
            sort,
        })
    }
}

fn salary(
    raw: &Option<Numeric>,
    field: &str,
    label: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    match raw.as_ref().and_then(Numeric::value)? {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
        Ok(n) if n.is_finite() => {
            errors.push(FieldError::new(field, "Salary cannot be negative"));
            None
        }
        _ => {
            errors.push(FieldError::new(field, format!("{} must be a number", label)));
            None
        }
    }
}

fn applicants(
    raw: &[ApplicantInput],
    now: DateTime<Utc>,
    errors: &mut Vec<FieldError>,
) -> Option<Vec<Applicant>> {
    let mut valid = true;
    let parsed: Vec<Applicant> = raw
        .iter()
        .filter_map(|a| {
            let user = a.user.as_deref().and_then(|u| Uuid::parse_str(u.trim()).ok());
            let applied_at = match a.applied_at.as_deref().filter(|s| !s.trim().is_empty()) {
                None => Some(now),
                Some(d) => parse_date(d),
            };
            let status = match a.status.as_deref().filter(|s| !s.trim().is_empty()) {
                None => Some(ApplicantStatus::default()),
                Some(s) => s.parse::<ApplicantStatus>().ok(),
            };
            match (user, applied_at, status) {
                (Some(user), Some(applied_at), Some(status)) => Some(Applicant {
                    user,
                    applied_at,
                    status,
                }),
                _ => {
                    valid = false;
                    None
                }
            }
        })
        .collect();
    if valid {
        Some(parsed)
    } else {
        errors.push(FieldError::new(
            "applicants",
            "Each applicant needs a valid user id, date and status",
        ));
        None
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn field_errors(e: &ValidationErrors) -> Vec<FieldError> {
    e.field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                FieldError::new(field.clone(), message)
            })
        })
        .collect()
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn rejected(mut errors: Vec<FieldError>) -> JobError {
    // one message per field, the first one reported
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors.dedup_by(|a, b| a.field == b.field);
    tracing::debug!("rejected input: {:?}", &errors);
    JobError::Validation(errors)
}
