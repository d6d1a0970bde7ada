use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::pkg::{internal::jobs::JobError, server::state::AppState};

// windows are swept once this many clients are tracked
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct FixedWindow {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: DashMap<String, FixedWindow>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        RateLimiter {
            max_requests,
            window,
            clients: DashMap::new(),
        }
    }

    /// Counts a request from `client`, returning false once the client has
    /// used up its allowance for the current window.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        if self.clients.len() >= SWEEP_THRESHOLD {
            self.clients
                .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        }
        let mut window = self
            .clients
            .entry(client.to_string())
            .or_insert(FixedWindow {
                started: now,
                count: 0,
            });
        if now.saturating_duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_key(&request);
    if !state.limiter.check(&client) {
        tracing::warn!("rate limit exceeded for {}", &client);
        return JobError::RateLimited.into_response();
    }
    next.run(request).await
}
