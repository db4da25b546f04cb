//! crates/launchpad_core/src/guards.rs
//!
//! Route guards: synchronous navigation policies evaluated against the Session
//! Store before a navigation completes.

use crate::session::SessionStore;

pub const AUTH_ROUTE: &str = "/auth";
pub const DEFAULT_LANDING: &str = "/dashboard";
pub const FORBIDDEN_ROUTE: &str = "/error/forbidden";
pub const EMAIL_VERIFICATION_ROUTE: &str = "/auth/email-verification";

/// What the router should do with a pending navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_string())
    }
}

/// Joins lazily-loaded route segments into the URL the guards check.
pub fn url_from_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| format!("/{}", segment.as_ref()))
        .collect()
}

/// Lets authenticated users through and sends everyone else to the login area.
pub struct ProtectedRouteGuard<'a> {
    session: &'a SessionStore,
}

impl<'a> ProtectedRouteGuard<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    /// Remembers `url` for the post-login redirect unless it is itself inside
    /// the auth area.
    pub fn check(&self, url: &str) -> GuardDecision {
        if self.session.is_authenticated() {
            return GuardDecision::Allow;
        }
        if !url.is_empty() && !url.starts_with(AUTH_ROUTE) {
            self.session.remember_redirect(url);
        }
        GuardDecision::redirect(AUTH_ROUTE)
    }
}

/// Keeps signed-in users out of the login and registration pages.
pub struct PublicOnlyGuard<'a> {
    session: &'a SessionStore,
}

impl<'a> PublicOnlyGuard<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    pub fn check(&self) -> GuardDecision {
        if self.session.is_authenticated() {
            GuardDecision::redirect(DEFAULT_LANDING)
        } else {
            GuardDecision::Allow
        }
    }
}

pub struct RoleGuard<'a> {
    session: &'a SessionStore,
}

impl<'a> RoleGuard<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    /// Requires authentication, then at least one of `required_roles`.
    /// An empty requirement admits any authenticated user.
    pub fn check(&self, url: &str, required_roles: &[&str]) -> GuardDecision {
        let decision = ProtectedRouteGuard::new(self.session).check(url);
        if !decision.is_allowed() {
            return decision;
        }
        if required_roles.is_empty() {
            return GuardDecision::Allow;
        }
        let roles = self.session.roles();
        if required_roles.iter().any(|role| roles.contains(*role)) {
            GuardDecision::Allow
        } else {
            GuardDecision::redirect(FORBIDDEN_ROUTE)
        }
    }
}
