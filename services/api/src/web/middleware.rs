//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting the admin routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use launchpad_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::HttpError;
use crate::web::client_ip::client_ip;
use crate::web::session_cookie;
use crate::web::state::AppState;

/// Middleware that validates the admin session cookie.
///
/// If valid, inserts the `AdminSession` into request extensions for handlers to use.
/// Unknown or expired sessions yield 401 "Unauthorized". Outside production a
/// session used from a different client address is destroyed and yields
/// 401 "Session invalid".
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    // 1. Parse session ID from cookie
    let session_id = session_cookie::read(req.headers())
        .ok_or_else(|| HttpError::unauthorized("Unauthorized"))?;

    // 2. Look the session up
    let session = state
        .db
        .get_admin_session(&session_id)
        .await
        .map_err(|e| {
            if !matches!(e, PortError::NotFound(_)) {
                error!("Failed to load admin session: {:?}", e);
            }
            HttpError::unauthorized("Unauthorized")
        })?;

    // 3. Reject and drop expired sessions
    if session.expires_at <= state.clock.utc() {
        discard(&state, &session.id).await;
        return Err(HttpError::unauthorized("Unauthorized"));
    }

    // 4. Sessions are pinned to the address that logged in, except in production
    if !state.config.production {
        let ip = client_ip(req.headers(), req.extensions());
        if session.client_ip.as_deref() != Some(ip.as_str()) {
            warn!(
                admin = %session.username,
                client = %ip,
                "admin session used from another address"
            );
            discard(&state, &session.id).await;
            return Err(HttpError::unauthorized("Session invalid"));
        }
    }

    // 5. Insert the session into request extensions
    req.extensions_mut().insert(session);

    // 6. Continue to the handler
    Ok(next.run(req).await)
}

async fn discard(state: &AppState, session_id: &str) {
    if let Err(e) = state.db.delete_admin_session(session_id).await {
        error!("Failed to delete admin session: {:?}", e);
    }
}
