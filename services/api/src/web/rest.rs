//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use utoipa::OpenApi;

use crate::web::admin::{
    self, AdminLoginRequest, NewsletterView, StatusMessage,
};
use crate::web::ideas::{self, RefineIdeaRequest, RefineIdeaResponse, SubmitIdeaRequest};
use crate::web::newsletter::{self, NewsletterRequest, NewsletterResponse};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        newsletter::newsletter_handler,
        ideas::refine_idea_handler,
        ideas::submit_idea_handler,
        admin::admin_login_handler,
        admin::admin_logout_handler,
        admin::list_newsletters_handler,
        admin::delete_newsletter_handler,
        admin::export_newsletters_handler,
    ),
    components(
        schemas(
            NewsletterRequest,
            NewsletterResponse,
            RefineIdeaRequest,
            RefineIdeaResponse,
            SubmitIdeaRequest,
            AdminLoginRequest,
            StatusMessage,
            NewsletterView,
        )
    ),
    tags(
        (name = "Launchpad API", description = "Waitlist, idea validation and admin dashboard endpoints.")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_public_path_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/newsletter",
            "/api/refine-idea",
            "/api/submit-idea",
            "/api/{admin_route}",
            "/api/admin/logout",
            "/api/admin/newsletters",
            "/api/admin/newsletters/{id}",
            "/api/admin/newsletters/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
