use crate::{conf::Settings, prelude::Result};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions};
use standard_error::{Interpolate, StandardError};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn apply(settings: &Settings) -> Result<()> {
    let url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| StandardError::new("ERR-DB-001"))?;
    let pool = PgPoolOptions::new()
        .connect(url)
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    tracing::debug!("connected to db");
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;
    MIGRATOR
        .run(&mut *tx)
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| StandardError::new("ERR-DB-000").interpolate_err(e.to_string()))?;

    tracing::info!("migrations applied successfully");
    Ok(())
}
