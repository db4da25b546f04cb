pub mod auth;
pub mod domain;
pub mod guards;
pub mod ports;
pub mod session;
pub mod validation;
pub mod wizard;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use auth::{AuthClient, AuthError};
pub use domain::{
    AdminCredential, AdminSession, AuthResult, IdeaSubmission, NewNewsletterSignup,
    NewsletterSignup, RefinedIdea, SessionRecord, SubmitIdeaResponse,
};
pub use guards::{GuardDecision, ProtectedRouteGuard, PublicOnlyGuard, RoleGuard};
pub use ports::{
    AuthApi, DatabaseService, IdeaApi, IdeaRefinementService, IdeaScoringService,
    KeyValueStorage, Navigator, PortError, PortResult, SharedClock,
};
pub use session::{MemoryStorage, SessionStore};
pub use wizard::{IdeaWizard, WizardError, WizardStep};
