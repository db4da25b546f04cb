//! services/api/src/web/routes.rs
//!
//! Assembles the HTTP router from the handlers, middleware and shared state.

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    admin::{
        admin_login_handler, admin_logout_handler, delete_newsletter_handler,
        export_newsletters_handler, list_newsletters_handler,
    },
    ideas::{refine_idea_handler, submit_idea_handler},
    middleware::require_admin,
    newsletter::newsletter_handler,
    rate_limit::rate_limit,
    rest::ApiDoc,
    state::AppState,
};

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            warn!("Ignoring unusable CORS origin {:?}: {}", origin, e);
            layer
        }
    }
}

/// Builds the complete application, Swagger UI included.
pub fn create_router(state: Arc<AppState>) -> Router {
    let login_path = format!("/api/{}", state.config.admin_route);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/newsletter", post(newsletter_handler))
        .route("/api/refine-idea", post(refine_idea_handler))
        .route(
            "/api/submit-idea",
            post(submit_idea_handler).layer(axum_middleware::from_fn_with_state(
                state.submission_limiter.clone(),
                rate_limit,
            )),
        )
        .route(
            &login_path,
            post(admin_login_handler).layer(axum_middleware::from_fn_with_state(
                state.login_limiter.clone(),
                rate_limit,
            )),
        )
        .route("/api/admin/logout", post(admin_logout_handler));

    // Protected routes (admin session required)
    let admin_routes = Router::new()
        .route("/api/admin/newsletters", get(list_newsletters_handler))
        .route("/api/admin/newsletters/export", get(export_newsletters_handler))
        .route("/api/admin/newsletters/{id}", delete(delete_newsletter_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
