use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::{JobStore, spec::JobEntry};
use crate::pkg::internal::jobs::{
    error::Result,
    input::JobPatch,
    paginate::{SortOrder, Window},
    query::JobQuery,
};

#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: DashMap<Uuid, JobEntry>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn compare(query: &JobQuery, sort: SortOrder, a: &JobEntry, b: &JobEntry) -> Ordering {
    let newest = b.created_at.cmp(&a.created_at);
    let salary = |v: Option<f64>| v.unwrap_or(0.0);
    match sort {
        SortOrder::Newest => newest,
        SortOrder::Oldest => a.created_at.cmp(&b.created_at),
        SortOrder::SalaryHigh => salary(b.salary_max)
            .total_cmp(&salary(a.salary_max))
            .then(newest),
        SortOrder::SalaryLow => salary(a.salary_min)
            .total_cmp(&salary(b.salary_min))
            .then(newest),
        SortOrder::Relevance => query.rank(b).cmp(&query.rank(a)).then(newest),
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn list(
        &self,
        query: &JobQuery,
        sort: SortOrder,
        window: Window,
    ) -> Result<(Vec<JobEntry>, u64)> {
        let mut matched: Vec<JobEntry> = self
            .jobs
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        let total = matched.len() as u64;
        matched.sort_by(|a, b| compare(query, sort, a, b));
        let page = matched
            .into_iter()
            .skip(window.skip as usize)
            .take(window.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<JobEntry>> {
        Ok(self.jobs.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, job: JobEntry) -> Result<JobEntry> {
        self.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JobEntry>> {
        Ok(self.jobs.get_mut(&id).map(|mut entry| {
            patch.apply(entry.value_mut(), now);
            entry.value().clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.jobs.remove(&id).is_some())
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        if let Some(mut entry) = self.jobs.get_mut(&id) {
            entry.views += 1;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<u64> {
        let removed = self.jobs.len() as u64;
        self.jobs.clear();
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::pkg::internal::{
        adaptors::jobs::spec::JobType,
        jobs::query::{JobFilter, build_query},
    };

    fn job(title: &str, age_days: i64) -> JobEntry {
        let created = Utc::now() - Duration::days(age_days);
        JobEntry {
            id: Uuid::new_v4(),
            job_title: title.into(),
            company_name: "Acme".into(),
            company_logo: None,
            location: "Chennai".into(),
            job_type: JobType::FullTime,
            experience: "1-3 yr Exp".into(),
            salary_min: None,
            salary_max: None,
            salary: "Negotiable".into(),
            application_deadline: None,
            job_description: "Details".into(),
            description: vec![],
            is_draft: false,
            is_active: true,
            posted_by: None,
            applicants: vec![],
            views: 0,
            created_at: created,
            updated_at: created,
        }
    }

    async fn seeded() -> MemoryJobStore {
        let store = MemoryJobStore::new();
        for (i, title) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            store.create(job(title, i as i64)).await.unwrap();
        }
        let mut draft = job("draft", 0);
        draft.is_draft = true;
        store.create(draft).await.unwrap();
        store
    }

    fn titles(jobs: &[JobEntry]) -> Vec<&str> {
        jobs.iter().map(|j| j.job_title.as_str()).collect()
    }

    #[tokio::test]
    async fn lists_newest_first_with_window_and_total() {
        let store = seeded().await;
        let query = build_query(&JobFilter::default());
        let (jobs, total) = store
            .list(&query, SortOrder::Newest, Window { skip: 2, limit: 2 })
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(titles(&jobs), vec!["c", "d"]);
    }

    #[tokio::test]
    async fn window_past_the_end_is_empty() {
        let store = seeded().await;
        let query = build_query(&JobFilter::default());
        let (jobs, total) = store
            .list(&query, SortOrder::Oldest, Window { skip: 10, limit: 5 })
            .await
            .unwrap();
        assert!(jobs.is_empty());
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn sorts_by_salary_with_missing_as_zero() {
        let store = MemoryJobStore::new();
        let mut high = job("high", 3);
        high.salary_max = Some(2_000_000.0);
        let mut low = job("low", 2);
        low.salary_max = Some(500_000.0);
        store.create(high).await.unwrap();
        store.create(low).await.unwrap();
        store.create(job("none", 1)).await.unwrap();

        let query = build_query(&JobFilter::default());
        let window = Window { skip: 0, limit: 10 };
        let (jobs, _) = store.list(&query, SortOrder::SalaryHigh, window).await.unwrap();
        assert_eq!(titles(&jobs), vec!["high", "low", "none"]);
    }

    #[tokio::test]
    async fn sorts_by_salary_floor_ascending() {
        let store = MemoryJobStore::new();
        let mut mid = job("mid", 3);
        mid.salary_min = Some(800_000.0);
        let mut cheap = job("cheap", 2);
        cheap.salary_min = Some(300_000.0);
        store.create(mid).await.unwrap();
        store.create(cheap).await.unwrap();
        store.create(job("none-old", 5)).await.unwrap();
        store.create(job("none-new", 1)).await.unwrap();

        let query = build_query(&JobFilter::default());
        let window = Window { skip: 0, limit: 10 };
        let (jobs, _) = store.list(&query, SortOrder::SalaryLow, window).await.unwrap();
        // missing floors count as 0, ties go to the newest
        assert_eq!(titles(&jobs), vec!["none-new", "none-old", "cheap", "mid"]);
    }

    #[tokio::test]
    async fn sorts_by_relevance_then_newest() {
        let store = MemoryJobStore::new();
        let mut both = job("Rust Backend Engineer", 4);
        both.job_description = "Postgres services".into();
        let mut rust_old = job("Rust Engineer", 3);
        rust_old.job_description = "Embedded".into();
        let mut rust_new = job("Rust Developer", 1);
        rust_new.job_description = "Tooling".into();
        let mut unrelated = job("Go Developer", 0);
        unrelated.job_description = "Postgres".into();
        for j in [both, rust_old, rust_new, unrelated] {
            store.create(j).await.unwrap();
        }

        let query = build_query(&JobFilter {
            search: Some("rust backend".into()),
            ..Default::default()
        });
        let window = Window { skip: 0, limit: 10 };
        let (jobs, total) = store.list(&query, SortOrder::Relevance, window).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(
            titles(&jobs),
            vec!["Rust Backend Engineer", "Rust Developer", "Rust Engineer"]
        );

        // without a search relevance is newest first
        let query = build_query(&JobFilter::default());
        let (jobs, _) = store.list(&query, SortOrder::Relevance, window).await.unwrap();
        assert_eq!(titles(&jobs)[0], "Go Developer");
    }

    #[tokio::test]
    async fn update_delete_and_views() {
        let store = MemoryJobStore::new();
        let created = store.create(job("a", 0)).await.unwrap();

        store.increment_views(created.id).await.unwrap();
        store.increment_views(created.id).await.unwrap();
        assert_eq!(store.get_by_id(created.id).await.unwrap().unwrap().views, 2);

        let patch = JobPatch {
            location: Some("Pune".into()),
            ..Default::default()
        };
        let updated = store
            .update(created.id, patch, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.location, "Pune");
        assert_eq!(updated.views, 2);

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get_by_id(created.id).await.unwrap().is_none());
        assert!(
            store
                .update(created.id, JobPatch::default(), Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = seeded().await;
        assert_eq!(store.clear().await.unwrap(), 6);
        assert!(store.is_empty());
    }
}
