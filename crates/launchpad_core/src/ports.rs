//! crates/launchpad_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases, HTTP
//! clients or browser storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;

use crate::domain::{
    AdminCredential, AdminSession, AuthResult, ForgotPasswordRequest, GoogleLoginRequest,
    IdeaSubmission, LoginRequest, NewNewsletterSignup, NewsletterSignup, RefinedIdea,
    RegisterRequest, ResetPasswordRequest, SubmitIdeaResponse,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The remote side answered with a failure and a message meant for the user.
    #[error("{0}")]
    Rejected(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// The clock every time-dependent check reads from.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

//=========================================================================================
// Server-side Ports
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Newsletter Management ---
    /// Looks up a signup by email, ignoring ASCII case.
    async fn find_newsletter_by_email(&self, email: &str) -> PortResult<Option<NewsletterSignup>>;

    async fn create_newsletter(&self, signup: &NewNewsletterSignup) -> PortResult<NewsletterSignup>;

    /// Returns every signup ordered by creation time, oldest first.
    async fn list_newsletters(&self) -> PortResult<Vec<NewsletterSignup>>;

    /// Deleting an id that does not exist is not an error.
    async fn delete_newsletter(&self, id: i32) -> PortResult<()>;

    // --- Admin Credentials ---
    async fn get_admin_by_username(&self, username: &str) -> PortResult<AdminCredential>;

    async fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> PortResult<AdminCredential>;

    // --- Admin Sessions ---
    async fn create_admin_session(&self, session: &AdminSession) -> PortResult<()>;

    /// Fetches a stored session regardless of expiry; callers check `expires_at`.
    async fn get_admin_session(&self, session_id: &str) -> PortResult<AdminSession>;

    async fn delete_admin_session(&self, session_id: &str) -> PortResult<()>;

    /// Removes every session whose `expires_at` is at or before `now`.
    /// Returns how many were removed.
    async fn delete_expired_admin_sessions(&self, now: DateTime<Utc>) -> PortResult<u64>;
}

#[async_trait]
pub trait IdeaRefinementService: Send + Sync {
    /// Expands a short idea into a problem statement and a target audience.
    async fn refine_idea(&self, idea: &str) -> PortResult<RefinedIdea>;
}

#[async_trait]
pub trait IdeaScoringService: Send + Sync {
    /// Sends a complete submission to the external analysis API and returns its
    /// response body untouched.
    async fn score_idea(&self, submission: &IdeaSubmission) -> PortResult<serde_json::Value>;
}

//=========================================================================================
// Client-side Ports
//=========================================================================================

/// String key/value storage, modelled on browser local and session storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Moves the user to another in-app location.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// The remote authentication API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> PortResult<AuthResult>;
    async fn register(&self, request: &RegisterRequest) -> PortResult<AuthResult>;
    async fn google_login(&self, request: &GoogleLoginRequest) -> PortResult<AuthResult>;
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> PortResult<AuthResult>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> PortResult<AuthResult>;
    async fn confirm_email(&self, user_id: &str, token: &str) -> PortResult<AuthResult>;
}

/// The marketing site's idea endpoints, as seen from the browser.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdeaApi: Send + Sync {
    async fn refine_idea(&self, idea: &str) -> PortResult<RefinedIdea>;
    async fn submit_idea(&self, submission: &IdeaSubmission) -> PortResult<SubmitIdeaResponse>;
}
