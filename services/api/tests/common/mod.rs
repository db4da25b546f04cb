//! Common test utilities for the API integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use api_lib::adapters::InMemoryDatabase;
use api_lib::config::Config;
use api_lib::web::{admin::seed_admin, create_router, AppState};
use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use launchpad_core::domain::{
    AdminCredential, AdminSession, IdeaSubmission, NewNewsletterSignup, NewsletterSignup,
    RefinedIdea,
};
use launchpad_core::ports::{
    DatabaseService, IdeaRefinementService, IdeaScoringService, PortError, PortResult,
};
use launchpad_core::test_support::ManualClock;
use serde_json::{json, Value};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const LOGIN_PATH: &str = "/api/secure-dashboard-login";

/// Refinement stub returning a fixed answer, or failing
pub struct StubRefiner {
    pub fail: bool,
    pub seen: Mutex<Vec<String>>,
}

#[async_trait]
impl IdeaRefinementService for StubRefiner {
    async fn refine_idea(&self, idea: &str) -> PortResult<RefinedIdea> {
        self.seen.lock().unwrap().push(idea.to_string());
        if self.fail {
            return Err(PortError::Unavailable("model offline".to_string()));
        }
        Ok(RefinedIdea {
            problem_statement: "Introverts find it hard to date on regular dating platforms"
                .to_string(),
            target_audience: "Introverted singles".to_string(),
        })
    }
}

/// Scoring stub that captures submissions
#[derive(Default)]
pub struct StubScorer {
    pub fail: bool,
    pub submissions: Mutex<Vec<IdeaSubmission>>,
}

#[async_trait]
impl IdeaScoringService for StubScorer {
    async fn score_idea(&self, submission: &IdeaSubmission) -> PortResult<Value> {
        self.submissions.lock().unwrap().push(submission.clone());
        if self.fail {
            return Err(PortError::Unavailable("status 502".to_string()));
        }
        Ok(json!({ "status": "queued", "score": 87 }))
    }
}

/// Which waitlist storage call should fail
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NewsletterFailure {
    Lookup,
    Insert,
}

/// Delegates to the in-memory database but fails the chosen newsletter call
pub struct FaultyNewsletterStore {
    inner: Arc<InMemoryDatabase>,
    failure: NewsletterFailure,
}

fn storage_down() -> PortError {
    PortError::Unexpected("connection reset by peer".to_string())
}

#[async_trait]
impl DatabaseService for FaultyNewsletterStore {
    async fn find_newsletter_by_email(&self, email: &str) -> PortResult<Option<NewsletterSignup>> {
        if self.failure == NewsletterFailure::Lookup {
            return Err(storage_down());
        }
        self.inner.find_newsletter_by_email(email).await
    }

    async fn create_newsletter(
        &self,
        signup: &NewNewsletterSignup,
    ) -> PortResult<NewsletterSignup> {
        if self.failure == NewsletterFailure::Insert {
            return Err(storage_down());
        }
        self.inner.create_newsletter(signup).await
    }

    async fn list_newsletters(&self) -> PortResult<Vec<NewsletterSignup>> {
        self.inner.list_newsletters().await
    }

    async fn delete_newsletter(&self, id: i32) -> PortResult<()> {
        self.inner.delete_newsletter(id).await
    }

    async fn get_admin_by_username(&self, username: &str) -> PortResult<AdminCredential> {
        self.inner.get_admin_by_username(username).await
    }

    async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> PortResult<AdminCredential> {
        self.inner.create_admin(username, password_hash).await
    }

    async fn create_admin_session(&self, session: &AdminSession) -> PortResult<()> {
        self.inner.create_admin_session(session).await
    }

    async fn get_admin_session(&self, session_id: &str) -> PortResult<AdminSession> {
        self.inner.get_admin_session(session_id).await
    }

    async fn delete_admin_session(&self, session_id: &str) -> PortResult<()> {
        self.inner.delete_admin_session(session_id).await
    }

    async fn delete_expired_admin_sessions(&self, now: DateTime<Utc>) -> PortResult<u64> {
        self.inner.delete_expired_admin_sessions(now).await
    }
}

pub struct TestOptions {
    pub production: bool,
    pub with_refiner: bool,
    pub refiner_fails: bool,
    pub scorer_fails: bool,
    pub newsletter_failure: Option<NewsletterFailure>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            production: false,
            with_refiner: true,
            refiner_fails: false,
            scorer_fails: false,
            newsletter_failure: None,
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<InMemoryDatabase>,
    pub clock: Arc<ManualClock>,
    pub refiner: Arc<StubRefiner>,
    pub scorer: Arc<StubScorer>,
}

fn test_config(production: bool) -> Config {
    let app_env = if production { "production" } else { "development" };
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        "APP_ENV" => Some(app_env.to_string()),
        "ADMIN_USERNAME" => Some(ADMIN_USERNAME.to_string()),
        "ADMIN_PASSWORD" => Some(ADMIN_PASSWORD.to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

/// Create a test server over the in-memory database with a seeded admin
pub async fn spawn_app(options: TestOptions) -> TestApp {
    let clock = Arc::new(ManualClock::starting_at(
        Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap(),
    ));
    let db = Arc::new(InMemoryDatabase::new(clock.clone()));
    let config = Arc::new(test_config(options.production));
    seed_admin(db.as_ref(), &config).await.expect("admin seeding succeeds");

    let refiner = Arc::new(StubRefiner {
        fail: options.refiner_fails,
        seen: Mutex::new(Vec::new()),
    });
    let scorer = Arc::new(StubScorer {
        fail: options.scorer_fails,
        ..StubScorer::default()
    });

    let store: Arc<dyn DatabaseService> = match options.newsletter_failure {
        Some(failure) => Arc::new(FaultyNewsletterStore {
            inner: db.clone(),
            failure,
        }),
        None => db.clone(),
    };

    let state = Arc::new(AppState::new(
        store,
        config,
        options
            .with_refiner
            .then(|| refiner.clone() as Arc<dyn IdeaRefinementService>),
        scorer.clone(),
        clock.clone(),
    ));

    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    TestApp {
        server,
        db,
        clock,
        refiner,
        scorer,
    }
}

pub fn forwarded_for(ip: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-forwarded-for"),
        HeaderValue::from_static(ip),
    )
}

/// Log in as the seeded admin from `ip` and return the session id
pub async fn login(server: &TestServer, ip: &'static str) -> String {
    let (name, value) = forwarded_for(ip);
    let response = server
        .post(LOGIN_PATH)
        .add_header(name, value)
        .json(&json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .await;
    assert_eq!(response.status_code(), 200);

    response
        .maybe_cookie("launchpad.sid")
        .expect("No session cookie")
        .value()
        .to_string()
}
