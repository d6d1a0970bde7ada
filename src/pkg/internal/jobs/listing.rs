use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::{
    derive::prepare_for_create,
    error::{JobError, Result},
    input::{JobPatch, ListRequest, NewJob},
    paginate::Pagination,
    query::build_query,
};
use crate::pkg::internal::adaptors::jobs::{JobStore, spec::JobEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            default_limit: 12,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobPage {
    pub jobs: Vec<JobEntry>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn JobStore>,
    config: ListingConfig,
}

impl ListingService {
    pub fn new(store: Arc<dyn JobStore>, config: ListingConfig) -> Self {
        ListingService { store, config }
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub async fn list_jobs(&self, request: ListRequest) -> Result<JobPage> {
        let query = build_query(&request.filter);
        let (jobs, total) = self
            .store
            .list(&query, request.sort, request.page.window())
            .await?;
        tracing::debug!(
            "listed {} of {} jobs (page {})",
            jobs.len(),
            total,
            request.page.page
        );
        Ok(JobPage {
            jobs,
            pagination: Pagination::new(request.page, total),
        })
    }

    /// Fetches one job and counts the view.
    ///
    /// The returned `views` is the value read plus one. Concurrent readers
    /// of the same job may therefore see the same number even though every
    /// read is counted in the store.
    pub async fn get_job(&self, id: &str) -> Result<JobEntry> {
        let id = parse_id(id)?;
        let mut job = self.store.get_by_id(id).await?.ok_or(JobError::NotFound)?;
        if let Err(e) = self.store.increment_views(id).await {
            tracing::warn!("failed to count view of job {}: {}", id, e);
        }
        job.views += 1;
        Ok(job)
    }

    pub async fn create_job(&self, input: NewJob) -> Result<JobEntry> {
        let job = prepare_for_create(input, Uuid::new_v4(), Utc::now());
        let job = self.store.create(job).await?;
        tracing::info!("created job {} ({})", job.id, &job.job_title);
        Ok(job)
    }

    pub async fn update_job(&self, id: &str, patch: JobPatch) -> Result<JobEntry> {
        let id = parse_id(id)?;
        let job = self
            .store
            .update(id, patch, Utc::now())
            .await?
            .ok_or(JobError::NotFound)?;
        tracing::info!("updated job {}", id);
        Ok(job)
    }

    pub async fn delete_job(&self, id: &str) -> Result<()> {
        let id = parse_id(id)?;
        if !self.store.delete(id).await? {
            return Err(JobError::NotFound);
        }
        tracing::info!("deleted job {}", id);
        Ok(())
    }
}

/// Ids that don't parse are reported the same way as unknown ids.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| JobError::NotFound)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::DateTime;

    use super::*;
    use crate::pkg::internal::{
        adaptors::jobs::{MemoryJobStore, spec::JobType},
        jobs::{
            input::{JobInput, ListParams},
            paginate::{PageRequest, SortOrder, Window},
            query::JobQuery,
        },
    };

    /// Memory store whose view counter is down.
    #[derive(Default)]
    struct NoViewsStore {
        inner: MemoryJobStore,
    }

    #[async_trait]
    impl JobStore for NoViewsStore {
        async fn list(
            &self,
            query: &JobQuery,
            sort: SortOrder,
            window: Window,
        ) -> Result<(Vec<JobEntry>, u64)> {
            self.inner.list(query, sort, window).await
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<JobEntry>> {
            self.inner.get_by_id(id).await
        }

        async fn create(&self, job: JobEntry) -> Result<JobEntry> {
            self.inner.create(job).await
        }

        async fn update(
            &self,
            id: Uuid,
            patch: JobPatch,
            now: DateTime<Utc>,
        ) -> Result<Option<JobEntry>> {
            self.inner.update(id, patch, now).await
        }

        async fn delete(&self, id: Uuid) -> Result<bool> {
            self.inner.delete(id).await
        }

        async fn increment_views(&self, _id: Uuid) -> Result<()> {
            Err(JobError::Store("views unavailable".into()))
        }

        async fn clear(&self) -> Result<u64> {
            self.inner.clear().await
        }

        async fn ping(&self) -> Result<()> {
            self.inner.ping().await
        }
    }

    fn service() -> ListingService {
        ListingService::new(Arc::new(MemoryJobStore::new()), ListingConfig::default())
    }

    fn input(title: &str) -> NewJob {
        JobInput {
            job_title: Some(title.into()),
            company_name: Some("Amazon".into()),
            location: Some("Chennai".into()),
            job_type: Some("Full Time".into()),
            job_description: Some("Ship features".into()),
            ..Default::default()
        }
        .into_new_job()
        .unwrap()
    }

    fn list_all(params: ListParams) -> ListRequest {
        params.into_request(&ListingConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let svc = service();
        let mut new_job = input("Full Stack Developer");
        new_job.salary_min = Some(1_000_000.0);
        new_job.company_logo = Some("/assets/amazon.png".into());
        let created = svc.create_job(new_job).await.unwrap();

        let fetched = svc.get_job(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.job_title, "Full Stack Developer");
        assert_eq!(fetched.company_name, "Amazon");
        assert_eq!(fetched.company_logo.as_deref(), Some("/assets/amazon.png"));
        assert_eq!(fetched.job_type, JobType::FullTime);
        assert_eq!(fetched.salary_min, Some(1_000_000.0));
        assert_eq!(fetched.description, vec!["Ship features"]);
    }

    #[tokio::test]
    async fn views_grow_with_every_read() {
        let svc = service();
        let id = svc.create_job(input("a")).await.unwrap().id.to_string();
        let first = svc.get_job(&id).await.unwrap().views;
        let second = svc.get_job(&id).await.unwrap().views;
        assert_eq!(first, 1);
        assert!(second >= first + 1);
    }

    #[tokio::test]
    async fn failed_view_count_still_returns_the_job() {
        let svc = ListingService::new(Arc::new(NoViewsStore::default()), ListingConfig::default());
        let id = svc.create_job(input("a")).await.unwrap().id.to_string();

        let job = svc.get_job(&id).await.unwrap();
        assert_eq!(job.job_title, "a");
        assert_eq!(job.views, 1);
        // nothing was persisted
        assert_eq!(svc.get_job(&id).await.unwrap().views, 1);
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let svc = service();
        let unknown = Uuid::new_v4().to_string();
        for id in [unknown.as_str(), "not-an-id", ""] {
            assert!(matches!(svc.get_job(id).await, Err(JobError::NotFound)));
            assert!(matches!(
                svc.update_job(id, JobPatch::default()).await,
                Err(JobError::NotFound)
            ));
            assert!(matches!(svc.delete_job(id).await, Err(JobError::NotFound)));
        }
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let svc = service();
        let id = svc.create_job(input("a")).await.unwrap().id.to_string();
        svc.delete_job(&id).await.unwrap();
        assert!(matches!(svc.get_job(&id).await, Err(JobError::NotFound)));
    }

    #[tokio::test]
    async fn update_leaves_derived_fields_alone() {
        let svc = service();
        let mut new_job = input("a");
        new_job.salary_max = Some(1_200_000.0);
        new_job.job_description = "one\ntwo".into();
        let created = svc.create_job(new_job).await.unwrap();

        let patch = JobInput {
            location: Some("Hyderabad".into()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        let updated = svc
            .update_job(&created.id.to_string(), patch)
            .await
            .unwrap();
        assert_eq!(updated.location, "Hyderabad");
        assert_eq!(updated.job_title, created.job_title);
        assert_eq!(updated.salary, "12LPA");
        assert_eq!(updated.description, vec!["one", "two"]);
        assert_eq!(updated.created_at, created.created_at);

        let patch = JobInput {
            job_description: Some("x\ny\nz".into()),
            salary_max: Some(crate::pkg::internal::jobs::input::Numeric::Number(5e6)),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        let updated = svc
            .update_job(&created.id.to_string(), patch)
            .await
            .unwrap();
        assert_eq!(updated.description, vec!["one", "two"]);
        assert_eq!(updated.salary, "12LPA");
    }

    #[tokio::test]
    async fn listing_hides_drafts_and_inactive() {
        let svc = service();
        svc.create_job(input("visible")).await.unwrap();
        let mut draft = input("draft");
        draft.is_draft = Some(true);
        svc.create_job(draft).await.unwrap();
        let mut inactive = input("inactive");
        inactive.is_active = Some(false);
        svc.create_job(inactive).await.unwrap();

        let page = svc.list_jobs(list_all(ListParams::default())).await.unwrap();
        assert_eq!(page.pagination.total_jobs, 1);
        assert_eq!(page.jobs[0].job_title, "visible");
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_and_consistent() {
        let svc = service();
        for i in 0..5 {
            svc.create_job(input(&format!("job {}", i))).await.unwrap();
        }
        let mut request = list_all(ListParams::default());
        request.page = PageRequest { page: 4, limit: 2 };
        let page = svc.list_jobs(request).await.unwrap();
        assert!(page.jobs.is_empty());
        assert_eq!(page.pagination.total_jobs, 5);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(!page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[tokio::test]
    async fn every_result_satisfies_the_filters() {
        let svc = service();
        let specs = [
            ("Rust Developer", "Bangalore", Some(900_000.0), Some(1_500_000.0)),
            ("Rust Intern", "bangalore", None, None),
            ("Go Developer", "Bangalore", Some(100_000.0), Some(300_000.0)),
            ("Rust Lead", "Chennai", Some(2_000_000.0), Some(3_000_000.0)),
        ];
        for (title, location, min, max) in specs {
            let mut job = input(title);
            job.location = location.into();
            job.salary_min = min;
            job.salary_max = max;
            svc.create_job(job).await.unwrap();
        }

        let page = svc
            .list_jobs(list_all(ListParams {
                search: Some("rust".into()),
                location: Some("BANGALORE".into()),
                salary_min: Some("500000".into()),
                salary_max: Some("2000000".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let mut titles: Vec<_> = page.jobs.iter().map(|j| j.job_title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Rust Developer", "Rust Intern"]);
    }
}
