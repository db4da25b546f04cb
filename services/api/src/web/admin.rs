//! services/api/src/web/admin.rs
//!
//! Admin login and logout, the waitlist dashboard endpoints, and start-up
//! seeding of the admin account.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use launchpad_core::domain::{AdminSession, NewsletterSignup};
use launchpad_core::ports::{DatabaseService, PortError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ApiError, HttpError};
use crate::export::{waitlist_workbook, EXPORT_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::web::client_ip::ClientIp;
use crate::web::session_cookie;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// One waitlist row as the dashboard sees it.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub telegram_username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NewsletterSignup> for NewsletterView {
    fn from(signup: NewsletterSignup) -> Self {
        Self {
            id: signup.id,
            name: signup.name,
            email: signup.email,
            telegram_username: signup.telegram_username,
            created_at: signup.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/{admin_route} - Log in to the admin dashboard
#[utoipa::path(
    post,
    path = "/api/{admin_route}",
    request_body = AdminLoginRequest,
    params(("admin_route" = String, Path, description = "The configured admin login path.")),
    responses(
        (status = 200, description = "Login successful, session cookie set", body = StatusMessage),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn admin_login_handler(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Json(req): Json<AdminLoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    // 1. Get admin by username
    let admin = match state.db.get_admin_by_username(&req.username).await {
        Ok(admin) => admin,
        Err(PortError::NotFound(_)) => return Err(HttpError::unauthorized("Invalid credentials")),
        Err(e) => {
            error!("Failed to get admin: {:?}", e);
            return Err(HttpError::internal("Login failed"));
        }
    };

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&admin.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        HttpError::internal("Login failed")
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(HttpError::unauthorized("Invalid credentials"));
    }

    // 3. Drop abandoned sessions, then create one pinned to the caller's address
    let now = state.clock.utc();
    match state.db.delete_expired_admin_sessions(now).await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "purged expired admin sessions"),
        Err(e) => error!("Failed to purge expired admin sessions: {:?}", e),
    }

    let session = AdminSession {
        id: Uuid::new_v4().to_string(),
        username: admin.username,
        client_ip: Some(ip),
        expires_at: now + session_cookie::session_lifetime(),
    };
    state.db.create_admin_session(&session).await.map_err(|e| {
        error!("Failed to create admin session: {:?}", e);
        HttpError::internal("Login failed")
    })?;
    info!(admin = %session.username, "admin logged in");

    // 4. Return response with cookie
    let cookie = session_cookie::issue(&session.id, state.config.production);
    Ok((
        [(header::SET_COOKIE, cookie)],
        StatusMessage::new("Logged in successfully"),
    ))
}

/// POST /api/admin/logout - End the admin session
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Logout successful", body = StatusMessage),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn admin_logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    if let Some(session_id) = session_cookie::read(&headers) {
        state.db.delete_admin_session(&session_id).await.map_err(|e| {
            error!("Failed to delete admin session: {:?}", e);
            HttpError::internal("Failed to logout")
        })?;
    }

    let cookie = session_cookie::clear(state.config.production);
    Ok((
        [(header::SET_COOKIE, cookie)],
        StatusMessage::new("Logged out successfully"),
    ))
}

/// GET /api/admin/newsletters - List every waitlist signup, oldest first
#[utoipa::path(
    get,
    path = "/api/admin/newsletters",
    responses(
        (status = 200, description = "All signups", body = Vec<NewsletterView>),
        (status = 401, description = "No valid admin session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_newsletters_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NewsletterView>>, HttpError> {
    let signups = state.db.list_newsletters().await.map_err(|e| {
        error!("Failed to list newsletters: {:?}", e);
        HttpError::internal("Failed to fetch newsletters")
    })?;
    Ok(Json(signups.into_iter().map(NewsletterView::from).collect()))
}

/// DELETE /api/admin/newsletters/{id} - Remove one signup
#[utoipa::path(
    delete,
    path = "/api/admin/newsletters/{id}",
    params(("id" = i32, Path, description = "The signup id.")),
    responses(
        (status = 200, description = "Signup deleted", body = StatusMessage),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "No valid admin session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_newsletter_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusMessage>, HttpError> {
    let id = id
        .parse::<i32>()
        .map_err(|_| HttpError::bad_request("Invalid newsletter id"))?;

    state.db.delete_newsletter(id).await.map_err(|e| {
        error!("Failed to delete newsletter {}: {:?}", id, e);
        HttpError::internal("Failed to delete newsletter")
    })?;
    Ok(StatusMessage::new("Newsletter deleted successfully"))
}

/// GET /api/admin/newsletters/export - Download the waitlist as a spreadsheet
#[utoipa::path(
    get,
    path = "/api/admin/newsletters/export",
    responses(
        (status = 200, description = "The waitlist as an .xlsx attachment"),
        (status = 401, description = "No valid admin session"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn export_newsletters_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let signups = state.db.list_newsletters().await.map_err(|e| {
        error!("Failed to list newsletters for export: {:?}", e);
        HttpError::internal("Failed to export newsletters")
    })?;

    let workbook = waitlist_workbook(&signups).map_err(|e| {
        error!("Failed to render waitlist workbook: {:?}", e);
        HttpError::internal("Failed to export newsletters")
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILE_NAME),
            ),
        ],
        workbook,
    ))
}

//=========================================================================================
// Start-up Seeding
//=========================================================================================

/// Creates the configured admin account unless it already exists.
pub async fn seed_admin(db: &dyn DatabaseService, config: &Config) -> Result<(), ApiError> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        info!("No admin credentials configured; skipping admin seeding.");
        return Ok(());
    };

    match db.get_admin_by_username(username).await {
        Ok(_) => {
            info!(admin = %username, "Admin account already present.");
            return Ok(());
        }
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash admin password: {}", e)))?
        .to_string();

    db.create_admin(username, &password_hash).await?;
    info!(admin = %username, "Admin account created.");
    Ok(())
}
