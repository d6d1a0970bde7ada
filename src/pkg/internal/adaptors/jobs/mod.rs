pub mod memory;
pub mod mutators;
pub mod selectors;
pub mod spec;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub use memory::MemoryJobStore;
use mutators::JobMutator;
use selectors::JobSelector;
use spec::JobEntry;

use crate::pkg::internal::jobs::{
    error::Result,
    input::JobPatch,
    paginate::{SortOrder, Window},
    query::JobQuery,
};

#[async_trait]
pub trait JobStore: Send + Sync + 'static {
    /// Returns the window of matching jobs and the count of all matches.
    async fn list(
        &self,
        query: &JobQuery,
        sort: SortOrder,
        window: Window,
    ) -> Result<(Vec<JobEntry>, u64)>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<JobEntry>>;

    async fn create(&self, job: JobEntry) -> Result<JobEntry>;

    /// `Ok(None)` when no job has this id.
    async fn update(
        &self,
        id: Uuid,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JobEntry>>;

    /// `Ok(false)` when no job has this id.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Atomic `views += 1`.
    async fn increment_views(&self, id: Uuid) -> Result<()>;

    /// Removes every job, returning how many were removed.
    async fn clear(&self) -> Result<u64>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: Arc<PgPool>,
}

impl PgJobStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        PgJobStore { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list(
        &self,
        query: &JobQuery,
        sort: SortOrder,
        window: Window,
    ) -> Result<(Vec<JobEntry>, u64)> {
        let mut conn = self.pool.acquire().await?;
        let mut selector = JobSelector::new(&mut *conn);
        let jobs = selector.list(query, sort, window).await?;
        let total = selector.count(query).await?;
        Ok((jobs, total))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<JobEntry>> {
        let mut conn = self.pool.acquire().await?;
        JobSelector::new(&mut *conn).get_by_id(id).await
    }

    async fn create(&self, job: JobEntry) -> Result<JobEntry> {
        let mut conn = self.pool.acquire().await?;
        JobMutator::new(&mut *conn).create(&job).await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<JobEntry>> {
        let mut conn = self.pool.acquire().await?;
        JobMutator::new(&mut *conn).update(id, patch, now).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        JobMutator::new(&mut *conn).delete(id).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        JobMutator::new(&mut *conn).increment_views(id).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let removed = JobMutator::new(&mut *tx).delete_all().await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        JobSelector::new(&mut *conn).ping().await
    }
}
