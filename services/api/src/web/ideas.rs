//! services/api/src/web/ideas.rs
//!
//! The idea refinement and submission endpoints behind the landing-page wizard.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use launchpad_core::domain::{IdeaSubmission, RefinedIdea};
use launchpad_core::validation::{validate_idea_submission, FieldError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::error::HttpError;
use crate::web::state::AppState;

pub const SUBMISSION_FALLBACK_MESSAGE: &str =
    "Thank you! We'll analyze your idea and send the results to your email shortly.";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RefineIdeaRequest {
    #[serde(default)]
    pub idea: String,
}

#[derive(Serialize, ToSchema)]
pub struct RefineIdeaResponse {
    pub problem_statement: String,
    pub target_audience: String,
}

impl From<RefinedIdea> for RefineIdeaResponse {
    fn from(refined: RefinedIdea) -> Self {
        Self {
            problem_statement: refined.problem_statement,
            target_audience: refined.target_audience,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitIdeaRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub target_audience: String,
}

impl From<SubmitIdeaRequest> for IdeaSubmission {
    fn from(req: SubmitIdeaRequest) -> Self {
        Self {
            idea: req.idea,
            problem_statement: req.problem_statement,
            target_audience: req.target_audience,
            email: req.email,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/refine-idea - Draft a problem statement and audience for an idea
#[utoipa::path(
    post,
    path = "/api/refine-idea",
    request_body = RefineIdeaRequest,
    responses(
        (status = 200, description = "Refined idea", body = RefineIdeaResponse),
        (status = 400, description = "Idea is required"),
        (status = 500, description = "Failed to refine idea"),
        (status = 503, description = "OpenAI service not configured")
    )
)]
pub async fn refine_idea_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefineIdeaRequest>, JsonRejection>,
) -> Result<Json<RefineIdeaResponse>, HttpError> {
    let refiner = state.refiner.as_ref().ok_or_else(|| {
        HttpError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "OpenAI service not configured",
        )
    })?;

    let idea = payload
        .map(|Json(req)| req.idea)
        .unwrap_or_default();
    if idea.trim().is_empty() {
        return Err(HttpError::bad_request("Idea is required"));
    }

    let refined = refiner.refine_idea(&idea).await.map_err(|e| {
        error!("Failed to refine idea: {:?}", e);
        HttpError::internal("Failed to refine idea")
    })?;
    Ok(Json(refined.into()))
}

/// POST /api/submit-idea - Queue an idea for analysis
///
/// Returns the analysis API's response as-is, or a generic acknowledgement
/// when that API cannot be reached.
#[utoipa::path(
    post,
    path = "/api/submit-idea",
    request_body = SubmitIdeaRequest,
    responses(
        (status = 200, description = "Submission accepted"),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many submissions")
    )
)]
pub async fn submit_idea_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitIdeaRequest>, JsonRejection>,
) -> Result<Json<Value>, HttpError> {
    let Json(req) = payload.map_err(|rejection| {
        HttpError::validation(vec![FieldError {
            field: "body".to_string(),
            message: rejection.body_text(),
        }])
    })?;
    let submission = IdeaSubmission::from(req);
    validate_idea_submission(&submission).map_err(|errors| HttpError::validation(errors.0))?;

    match state.scorer.score_idea(&submission).await {
        Ok(analysis) => {
            info!("Idea forwarded to the analysis API");
            Ok(Json(analysis))
        }
        Err(e) => {
            warn!("Analysis API unavailable, acknowledging anyway: {:?}", e);
            Ok(Json(json!({
                "message": SUBMISSION_FALLBACK_MESSAGE,
                "status": "success",
            })))
        }
    }
}
