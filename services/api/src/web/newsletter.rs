//! services/api/src/web/newsletter.rs
//!
//! The public waitlist signup endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use launchpad_core::domain::NewNewsletterSignup;
use launchpad_core::validation::validate_newsletter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::error::HttpError;
use crate::web::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to dassyor! We'll notify you when we launch.";

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub telegram_username: Option<String>,
}

impl From<NewsletterRequest> for NewNewsletterSignup {
    fn from(req: NewsletterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            telegram_username: req.telegram_username.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct NewsletterResponse {
    pub message: String,
    pub status: String,
}

fn welcome() -> Json<NewsletterResponse> {
    Json(NewsletterResponse {
        message: WELCOME_MESSAGE.to_string(),
        status: "success".to_string(),
    })
}

/// POST /api/newsletter - Join the waitlist
///
/// Repeat signups and storage failures look identical to a fresh signup.
#[utoipa::path(
    post,
    path = "/api/newsletter",
    request_body = NewsletterRequest,
    responses(
        (status = 200, description = "Signup accepted", body = NewsletterResponse),
        (status = 400, description = "Invalid email format")
    )
)]
pub async fn newsletter_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewsletterRequest>, JsonRejection>,
) -> Result<Json<NewsletterResponse>, HttpError> {
    let Json(req) = payload.map_err(|_| HttpError::bad_request("Invalid email format"))?;
    let signup = NewNewsletterSignup::from(req);
    validate_newsletter(&signup).map_err(|_| HttpError::bad_request("Invalid email format"))?;

    match state.db.find_newsletter_by_email(&signup.email).await {
        Ok(Some(_)) => debug!("Newsletter email already registered"),
        Ok(None) => {
            if let Err(e) = state.db.create_newsletter(&signup).await {
                error!("Failed to store newsletter signup: {:?}", e);
            }
        }
        Err(e) => error!("Failed to check for an existing newsletter signup: {:?}", e),
    }

    Ok(welcome())
}
