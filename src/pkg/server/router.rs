use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use super::handlers::{
    jobs,
    probes::{health, healthz, livez, not_found},
};
use super::middlewares::ratelimit;
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    let job_routes = Router::new()
        .route("/", get(jobs::list).post(jobs::create))
        .route("/search", get(jobs::search))
        .route(
            "/{id}",
            get(jobs::retrieve).put(jobs::update).delete(jobs::delete),
        );

    let api = Router::new()
        .nest("/jobs", job_routes)
        .route("/health", get(health))
        .layer(from_fn_with_state(state.clone(), ratelimit::limit));

    Router::new()
        .nest("/api", api)
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
