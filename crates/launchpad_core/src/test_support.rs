//! Test doubles shared by the workspace's unit and integration tests.
//! Enabled outside this crate through the `test-support` feature.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};

use crate::domain::AuthResult;
use crate::ports::Navigator;
use crate::session::{MemoryStorage, SessionStore};

/// A clock that only moves when `advance` is called.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl Default for ManualClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self(Mutex::new(start))
    }
}

impl ManualClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.0.lock().unwrap() += delta;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingNavigator(pub Mutex<Vec<String>>);

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.0.lock().unwrap().push(path.to_string());
    }
}

pub fn successful_login(expiration: Option<DateTime<Utc>>, roles: &[&str]) -> AuthResult {
    AuthResult {
        is_success: true,
        message: "Login successful".to_string(),
        token_type: Some("Bearer".to_string()),
        access_token: Some("token-123".to_string()),
        expiration,
        user_id: Some("user-1".to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        ..AuthResult::default()
    }
}

pub fn memory_session(clock: Arc<ManualClock>) -> SessionStore {
    SessionStore::new(
        Arc::new(MemoryStorage::new()),
        Arc::new(MemoryStorage::new()),
        clock,
    )
}
