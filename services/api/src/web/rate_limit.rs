//! services/api/src/web/rate_limit.rs
//!
//! Fixed-window request limits keyed by client address.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, TimeDelta, Utc};
use launchpad_core::ports::SharedClock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::HttpError;
use crate::web::client_ip::client_ip;

pub const LOGIN_LIMIT_MESSAGE: &str = "Too many login attempts, please try again later";
pub const SUBMISSION_LIMIT_MESSAGE: &str = "Too many submissions from this IP, please try again";

const MAX_ATTEMPTS: u32 = 5;
const WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Clone)]
struct Window {
    started_at: DateTime<Utc>,
    count: u32,
}

/// Counts every attempt, successful or not, in windows of fixed length.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    max_attempts: u32,
    window: TimeDelta,
    message: &'static str,
    scope: &'static str,
    clock: SharedClock,
}

impl RateLimiter {
    pub fn new(
        scope: &'static str,
        max_attempts: u32,
        window: TimeDelta,
        message: &'static str,
        clock: SharedClock,
    ) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            max_attempts,
            window,
            message,
            scope,
            clock,
        }
    }

    /// Five admin login attempts per fifteen minutes.
    pub fn admin_login(clock: SharedClock) -> Self {
        Self::new(
            "admin_login",
            MAX_ATTEMPTS,
            TimeDelta::minutes(WINDOW_MINUTES),
            LOGIN_LIMIT_MESSAGE,
            clock,
        )
    }

    /// Five idea submissions per fifteen minutes.
    pub fn idea_submissions(clock: SharedClock) -> Self {
        Self::new(
            "submit_idea",
            MAX_ATTEMPTS,
            TimeDelta::minutes(WINDOW_MINUTES),
            SUBMISSION_LIMIT_MESSAGE,
            clock,
        )
    }

    /// Records one attempt for `key` and reports whether it is within the limit.
    pub async fn allow(&self, key: &str) -> bool {
        let now = self.clock.utc();
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now - w.started_at < self.window);

        let window = windows.entry(key.to_string()).or_insert_with(|| Window {
            started_at: now,
            count: 0,
        });
        window.count += 1;
        window.count <= self.max_attempts
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Rejects the request with 429 once its client has used up the window.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let ip = client_ip(req.headers(), req.extensions());
    if !limiter.allow(&ip).await {
        warn!(scope = limiter.scope, client = %ip, "rate limit exceeded");
        return HttpError::new(StatusCode::TOO_MANY_REQUESTS, limiter.message()).into_response();
    }
    next.run(req).await
}
