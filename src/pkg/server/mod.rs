pub mod handlers;
pub mod middlewares;
pub mod response;
pub mod router;
pub mod state;

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method, header};
use standard_error::{Interpolate, StandardError};
use tower_http::cors::CorsLayer;

use crate::{conf::Settings, prelude::Result};
use router::build_routes;
use state::AppState;

pub fn cors(settings: &Settings) -> Result<CorsLayer> {
    // credentialed requests cannot use a wildcard origin
    if settings.cors_origin.contains('*') {
        return Err(StandardError::new("ERR-SRV-001")
            .interpolate_err("wildcard origin with credentials".to_string()));
    }
    let origin = settings
        .cors_origin
        .trim()
        .parse::<HeaderValue>()
        .map_err(|e| StandardError::new("ERR-SRV-001").interpolate_err(e.to_string()))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

pub async fn listen(settings: &Settings) -> Result<()> {
    let state = AppState::new(settings)?;
    let app = build_routes(state).layer(cors(settings)?);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.listen_port))
        .await
        .map_err(|e| StandardError::new("ERR-SRV-000").interpolate_err(e.to_string()))?;
    tracing::info!(
        "{} listening at port {}",
        &settings.service_name,
        settings.listen_port
    );
    tokio::select! {
        r = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()) => {
            tracing::warn!("server ended unexpectedly: {:?}", &r)
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl+c interrupt, closing server");
        }
    }
    Ok(())
}
