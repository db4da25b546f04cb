//! crates/launchpad_core/src/domain.rs
//!
//! Defines the core data structures shared by the client-side session logic,
//! the idea wizard and the newsletter service. Wire names follow the JSON
//! contracts of the HTTP APIs they travel over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

//=========================================================================================
// Authentication
//=========================================================================================

/// The client-held proof of authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub access_token: String,
    pub user_id: String,
    pub roles: BTreeSet<String>,
    /// `None` when the auth API did not report an expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// The result object returned by every call to the remote auth API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResult {
    pub is_success: bool,
    pub message: String,
    pub errors: Vec<String>,
    pub token_type: Option<String>,
    pub access_token: Option<String>,
    pub expiration: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub roles: Vec<String>,
    pub expires_in_seconds: Option<f64>,
}

impl AuthResult {
    /// Builds the session record this result carries, if it is a successful
    /// result with a non-empty access token.
    pub fn session_record(&self) -> Option<SessionRecord> {
        if !self.is_success {
            return None;
        }
        let token = self.access_token.as_deref().filter(|t| !t.is_empty())?;
        Some(SessionRecord {
            access_token: token.to_string(),
            user_id: self.user_id.clone().unwrap_or_default(),
            roles: self.roles.iter().cloned().collect(),
            expires_at: self.expiration,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// The Google ID token travels in the `credential` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub credential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub token: String,
    pub new_password: String,
}

//=========================================================================================
// Idea validation
//=========================================================================================

/// The payload the wizard submits once all four fields are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaSubmission {
    pub idea: String,
    pub problem_statement: String,
    pub target_audience: String,
    pub email: String,
}

/// The structured pair returned by the refinement LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinedIdea {
    pub problem_statement: String,
    pub target_audience: String,
}

/// The user-facing acknowledgement of an idea submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitIdeaResponse {
    pub message: String,
    pub status: String,
}

//=========================================================================================
// Newsletter and admin
//=========================================================================================

/// A stored newsletter signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSignup {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub telegram_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A signup as submitted through the public newsletter form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNewsletterSignup {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_username: Option<String>,
}

// Only used internally for the admin login - contains sensitive data
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

// Represents a server-held admin session (the cookie carries only `id`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub id: String,
    pub username: String,
    pub client_ip: Option<String>,
    pub expires_at: DateTime<Utc>,
}
