use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri},
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::pkg::{
    internal::jobs::JobError,
    server::{response::Envelope, state::AppState},
};

pub async fn livez() -> StatusCode {
    tracing::debug!("service is live");
    StatusCode::OK
}

pub async fn healthz(State(state): State<AppState>) -> Result<StatusCode, JobError> {
    state.listing.store().ping().await?;
    tracing::debug!("service is healthy");
    Ok(StatusCode::OK)
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, success, database) = match state.listing.store().ping().await {
        Ok(()) => (StatusCode::OK, true, "Connected"),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, false, "Disconnected")
        }
    };
    (
        status,
        Json(json!({
            "success": success,
            "message": "Job Board API is running",
            "timestamp": Utc::now().to_rfc3339(),
            "database": database,
        })),
    )
}

pub async fn not_found(uri: Uri) -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(Envelope::failure(format!("Not found - {}", uri.path()))),
    )
}
