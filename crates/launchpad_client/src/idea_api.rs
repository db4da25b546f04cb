//! crates/launchpad_client/src/idea_api.rs
//!
//! The `IdeaApi` port over HTTP, against the landing site's idea endpoints.

use async_trait::async_trait;
use launchpad_core::domain::{IdeaSubmission, RefinedIdea, SubmitIdeaResponse};
use launchpad_core::ports::{IdeaApi, PortResult};
use reqwest::Client;
use serde_json::json;

use crate::config::ClientConfig;
use crate::http::{map_transport_error, read_json};

#[derive(Clone)]
pub struct HttpIdeaApi {
    client: Client,
    config: ClientConfig,
}

impl HttpIdeaApi {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl IdeaApi for HttpIdeaApi {
    async fn refine_idea(&self, idea: &str) -> PortResult<RefinedIdea> {
        let response = self
            .client
            .post(self.config.endpoint("api/refine-idea"))
            .json(&json!({ "idea": idea }))
            .send()
            .await
            .map_err(map_transport_error)?;
        read_json(response).await
    }

    async fn submit_idea(&self, submission: &IdeaSubmission) -> PortResult<SubmitIdeaResponse> {
        let response = self
            .client
            .post(self.config.endpoint("api/submit-idea"))
            .json(submission)
            .send()
            .await
            .map_err(map_transport_error)?;
        read_json(response).await
    }
}
