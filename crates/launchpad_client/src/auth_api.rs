//! crates/launchpad_client/src/auth_api.rs
//!
//! The `AuthApi` port over HTTP, against the platform's `/api/auth` routes.

use async_trait::async_trait;
use launchpad_core::domain::{
    AuthResult, ForgotPasswordRequest, GoogleLoginRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use launchpad_core::ports::{AuthApi, PortResult};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::http::{map_transport_error, read_json};

const AUTH_PREFIX: &str = "api/auth";

#[derive(Clone)]
pub struct HttpAuthApi {
    client: Client,
    config: ClientConfig,
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, operation: &str) -> String {
        self.config.endpoint(&format!("{}/{}", AUTH_PREFIX, operation))
    }

    async fn post<B: Serialize + Sync>(&self, operation: &str, body: &B) -> PortResult<AuthResult> {
        debug!(operation, "auth request");
        let response = self
            .client
            .post(self.url(operation))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> PortResult<AuthResult> {
        self.post("login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> PortResult<AuthResult> {
        self.post("register", request).await
    }

    async fn google_login(&self, request: &GoogleLoginRequest) -> PortResult<AuthResult> {
        self.post("google-login", request).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> PortResult<AuthResult> {
        self.post("forgot-password", request).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> PortResult<AuthResult> {
        self.post("reset-password", request).await
    }

    async fn confirm_email(&self, user_id: &str, token: &str) -> PortResult<AuthResult> {
        debug!(operation = "confirm-email", "auth request");
        let response = self
            .client
            .get(self.url("confirm-email"))
            .query(&[("userId", user_id), ("token", token)])
            .send()
            .await
            .map_err(map_transport_error)?;
        read_json(response).await
    }
}
