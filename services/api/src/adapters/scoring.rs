//! services/api/src/adapters/scoring.rs
//!
//! This module contains the adapter for the external idea-analysis API.
//! It implements the `IdeaScoringService` port from the `core` crate.

use async_trait::async_trait;
use launchpad_core::{
    domain::IdeaSubmission,
    ports::{IdeaScoringService, PortError, PortResult},
};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// The body the analysis API expects; the idea travels as `query`.
#[derive(Debug, Serialize)]
struct ScoringPayload<'a> {
    email: &'a str,
    query: &'a str,
    problem_statement: &'a str,
    target_audience: &'a str,
}

impl<'a> From<&'a IdeaSubmission> for ScoringPayload<'a> {
    fn from(submission: &'a IdeaSubmission) -> Self {
        Self {
            email: &submission.email,
            query: &submission.idea,
            problem_statement: &submission.problem_statement,
            target_audience: &submission.target_audience,
        }
    }
}

/// Forwards submissions to the analysis API over HTTP.
#[derive(Clone)]
pub struct HttpScoringAdapter {
    client: Client,
    endpoint: String,
}

impl HttpScoringAdapter {
    /// Builds the adapter with a client bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: String,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

fn map_transport_error(error: reqwest::Error) -> PortError {
    if error.is_timeout() {
        PortError::Unavailable(format!("analysis API timed out: {}", error))
    } else {
        PortError::Unavailable(error.to_string())
    }
}

#[async_trait]
impl IdeaScoringService for HttpScoringAdapter {
    async fn score_idea(&self, submission: &IdeaSubmission) -> PortResult<serde_json::Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScoringPayload::from(submission))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // The analysis API sometimes explains itself in a `message` field.
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| "Failed to submit to external API".to_string());
            return Err(PortError::Unavailable(format!(
                "status {}: {}",
                status.as_u16(),
                detail
            )));
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            PortError::Unexpected(format!("analysis API returned invalid JSON: {}", e))
        })
    }
}
