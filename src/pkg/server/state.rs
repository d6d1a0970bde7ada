use std::{sync::Arc, time::Duration};

use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use standard_error::{Interpolate, StandardError};

use super::middlewares::ratelimit::RateLimiter;
use crate::{
    conf::{Settings, StoreKind},
    pkg::internal::{
        adaptors::jobs::{JobStore, MemoryJobStore, PgJobStore},
        jobs::ListingService,
    },
    prelude::Result,
};

pub fn db_pool(settings: &Settings) -> Result<Pool<Postgres>> {
    let url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| StandardError::new("ERR-DB-001"))?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(url)
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;
    Ok(pool)
}

pub fn job_store(settings: &Settings) -> Result<Arc<dyn JobStore>> {
    let store: Arc<dyn JobStore> = match settings.store {
        StoreKind::Postgres => Arc::new(PgJobStore::new(Arc::new(db_pool(settings)?))),
        StoreKind::Memory => {
            tracing::warn!("using in-memory job store, jobs are lost on restart");
            Arc::new(MemoryJobStore::new())
        }
    };
    Ok(store)
}

#[derive(Clone)]
pub struct AppState {
    pub listing: ListingService,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<AppState> {
        Ok(AppState::with_store(job_store(settings)?, settings))
    }

    pub fn with_store(store: Arc<dyn JobStore>, settings: &Settings) -> AppState {
        AppState {
            listing: ListingService::new(store, settings.listing()),
            limiter: Arc::new(RateLimiter::new(
                settings.rate_limit_max_requests,
                Duration::from_secs(settings.rate_limit_window_secs),
            )),
        }
    }
}
