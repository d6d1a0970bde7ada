use std::collections::HashSet;

use crate::pkg::internal::adaptors::jobs::spec::{JobEntry, JobType};

/// Optional, independently combinable listing filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `isActive && !isDraft`
    Listed,
    /// Token match over title, company and description.
    Text(String),
    /// Case-insensitive substring of `location`.
    LocationContains(String),
    JobTypeIs(JobType),
    /// `salaryMin >= floor`, or no `salaryMin` at all.
    SalaryFloor(f64),
    /// `salaryMax <= ceiling`, or no `salaryMax` at all.
    SalaryCeiling(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    predicates: Vec<Predicate>,
}

pub fn build_query(filter: &JobFilter) -> JobQuery {
    let mut predicates = vec![Predicate::Listed];
    if let Some(search) = &filter.search {
        predicates.push(Predicate::Text(search.clone()));
    }
    if let Some(location) = &filter.location {
        predicates.push(Predicate::LocationContains(location.clone()));
    }
    if let Some(job_type) = filter.job_type {
        predicates.push(Predicate::JobTypeIs(job_type));
    }
    if let Some(floor) = filter.salary_min {
        predicates.push(Predicate::SalaryFloor(floor));
    }
    if let Some(ceiling) = filter.salary_max {
        predicates.push(Predicate::SalaryCeiling(ceiling));
    }
    JobQuery { predicates }
}

impl JobQuery {
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn search(&self) -> Option<&str> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn matches(&self, job: &JobEntry) -> bool {
        self.predicates.iter().all(|p| p.matches(job))
    }

    /// Number of distinct search tokens found in the job, 0 without a search.
    pub fn rank(&self, job: &JobEntry) -> usize {
        match self.search() {
            None => 0,
            Some(text) => {
                let corpus = corpus_tokens(job);
                tokens(text)
                    .into_iter()
                    .collect::<HashSet<_>>()
                    .iter()
                    .filter(|t| corpus.contains(*t))
                    .count()
            }
        }
    }
}

impl Predicate {
    pub fn matches(&self, job: &JobEntry) -> bool {
        match self {
            Predicate::Listed => job.is_listed(),
            Predicate::Text(text) => {
                let corpus = corpus_tokens(job);
                tokens(text).iter().any(|t| corpus.contains(t))
            }
            Predicate::LocationContains(needle) => job
                .location
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::JobTypeIs(job_type) => job.job_type == *job_type,
            Predicate::SalaryFloor(floor) => job.salary_min.is_none_or(|min| min >= *floor),
            Predicate::SalaryCeiling(ceiling) => {
                job.salary_max.is_none_or(|max| max <= *ceiling)
            }
        }
    }
}

/// Lowercased alphanumeric runs.
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn corpus_tokens(job: &JobEntry) -> HashSet<String> {
    [&job.job_title, &job.company_name, &job.job_description]
        .into_iter()
        .flat_map(|field| tokens(field))
        .collect()
}
