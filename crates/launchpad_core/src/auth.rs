//! crates/launchpad_core/src/auth.rs
//!
//! The Authentication Client: talks to the remote auth API through the `AuthApi`
//! port and keeps the Session Store in sync with the results.

use std::sync::Arc;
use tracing::{error, info};

use crate::domain::{
    AuthResult, ForgotPasswordRequest, GoogleLoginRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
use crate::guards::{AUTH_ROUTE, DEFAULT_LANDING, EMAIL_VERIFICATION_ROUTE};
use crate::ports::{AuthApi, Navigator, PortError, PortResult};
use crate::session::SessionStore;

/// A failed auth call, carrying the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    fn from_port(err: PortError, fallback: &str) -> Self {
        let message = match err {
            PortError::Rejected(message) if !message.trim().is_empty() => message,
            other => {
                error!("Auth request failed: {}", other);
                fallback.to_string()
            }
        };
        Self { message }
    }
}

pub struct AuthClient {
    api: Arc<dyn AuthApi>,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl AuthClient {
    pub fn new(
        api: Arc<dyn AuthApi>,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Signs in with email and password. On success the Session Record is stored
    /// and the user is sent to the remembered deep link or the dashboard.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let outcome = self.api.login(&request).await;
        self.finish_sign_in(outcome, "Login failed")
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self
            .api
            .register(&request)
            .await
            .map_err(|e| AuthError::from_port(e, "Registration failed"))?;
        if result.is_success {
            self.navigator.navigate(EMAIL_VERIFICATION_ROUTE);
        }
        Ok(result)
    }

    pub async fn google_login(&self, id_token: &str) -> Result<AuthResult, AuthError> {
        let request = GoogleLoginRequest {
            credential: id_token.to_string(),
        };
        let outcome = self.api.google_login(&request).await;
        self.finish_sign_in(outcome, "Google login failed")
    }

    pub async fn forgot_password(&self, email: &str) -> Result<AuthResult, AuthError> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.api
            .forgot_password(&request)
            .await
            .map_err(|e| AuthError::from_port(e, "Password reset request failed"))
    }

    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<AuthResult, AuthError> {
        let request = ResetPasswordRequest {
            email: email.to_string(),
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.api
            .reset_password(&request)
            .await
            .map_err(|e| AuthError::from_port(e, "Password reset failed"))
    }

    pub async fn confirm_email(&self, user_id: &str, token: &str) -> Result<AuthResult, AuthError> {
        self.api
            .confirm_email(user_id, token)
            .await
            .map_err(|e| AuthError::from_port(e, "Email confirmation failed"))
    }

    pub fn logout(&self) {
        self.session.clear();
        self.navigator.navigate(AUTH_ROUTE);
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.session.has_role(role)
    }

    fn finish_sign_in(
        &self,
        outcome: PortResult<AuthResult>,
        fallback: &str,
    ) -> Result<AuthResult, AuthError> {
        let result = outcome.map_err(|e| AuthError::from_port(e, fallback))?;
        self.session.save(&result);
        if result.is_success {
            let target = self
                .session
                .take_redirect()
                .unwrap_or_else(|| DEFAULT_LANDING.to_string());
            info!("Signed in, navigating to {}", target);
            self.navigator.navigate(&target);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockAuthApi;
    use crate::test_support::{memory_session, successful_login, ManualClock, RecordingNavigator};
    use rstest::rstest;

    fn client(api: MockAuthApi) -> (AuthClient, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let session = memory_session(Arc::new(ManualClock::default()));
        (
            AuthClient::new(Arc::new(api), session, navigator.clone()),
            navigator,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn login_stores_session_and_goes_to_dashboard() {
        let mut api = MockAuthApi::new();
        api.expect_login()
            .withf(|req| req.email == "ada@example.com" && req.password == "secret-pass")
            .times(1)
            .returning(|_| Ok(successful_login(None, &["USER"])));
        let (client, navigator) = client(api);

        let result = client.login("ada@example.com", "secret-pass").await.unwrap();

        assert!(result.is_success);
        assert!(client.is_authenticated());
        assert!(client.has_role("USER"));
        assert_eq!(navigator.visited(), vec!["/dashboard".to_string()]);
    }

    #[rstest]
    #[tokio::test]
    async fn login_uses_remembered_deep_link_once() {
        let mut api = MockAuthApi::new();
        api.expect_login()
            .times(2)
            .returning(|_| Ok(successful_login(None, &[])));
        let (client, navigator) = client(api);
        client.session().remember_redirect("/projects/42");

        client.login("a@b.co", "pw").await.unwrap();
        client.login("a@b.co", "pw").await.unwrap();

        assert_eq!(
            navigator.visited(),
            vec!["/projects/42".to_string(), "/dashboard".to_string()]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unsuccessful_result_neither_stores_nor_navigates() {
        let mut api = MockAuthApi::new();
        api.expect_login().returning(|_| {
            Ok(AuthResult {
                is_success: false,
                message: "Email not confirmed".to_string(),
                ..AuthResult::default()
            })
        });
        let (client, navigator) = client(api);

        let result = client.login("a@b.co", "pw").await.unwrap();

        assert_eq!(result.message, "Email not confirmed");
        assert!(!client.is_authenticated());
        assert!(navigator.visited().is_empty());
    }

    #[rstest]
    #[case(
        PortError::Rejected("Invalid email or password".to_string()),
        "Invalid email or password"
    )]
    #[case(PortError::Rejected("  ".to_string()), "Login failed")]
    #[case(PortError::Unexpected("connection reset".to_string()), "Login failed")]
    #[tokio::test]
    async fn login_failure_surfaces_server_message_or_fallback(
        #[case] failure: PortError,
        #[case] expected: &str,
    ) {
        let mut api = MockAuthApi::new();
        api.expect_login()
            .times(1)
            .returning(move |_| Err(failure.clone()));
        let (client, _) = client(api);

        let err = client.login("a@b.co", "pw").await.unwrap_err();
        assert_eq!(err.message, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn register_success_goes_to_email_verification() {
        let mut api = MockAuthApi::new();
        api.expect_register().returning(|_| {
            Ok(AuthResult {
                is_success: true,
                message: "Check your inbox".to_string(),
                ..AuthResult::default()
            })
        });
        let (client, navigator) = client(api);

        client.register("a@b.co", "long-password").await.unwrap();

        assert!(!client.is_authenticated());
        assert_eq!(navigator.visited(), vec!["/auth/email-verification".to_string()]);
    }

    #[rstest]
    #[tokio::test]
    async fn google_login_behaves_like_login() {
        let mut api = MockAuthApi::new();
        api.expect_google_login()
            .withf(|req| req.credential == "google-id-token")
            .returning(|_| Ok(successful_login(None, &["USER"])));
        let (client, navigator) = client(api);

        client.google_login("google-id-token").await.unwrap();

        assert!(client.is_authenticated());
        assert_eq!(navigator.visited(), vec!["/dashboard".to_string()]);
    }

    #[rstest]
    #[tokio::test]
    async fn reset_and_confirm_use_their_own_fallbacks() {
        let mut api = MockAuthApi::new();
        api.expect_reset_password()
            .withf(|req| req.token == "tok" && req.new_password == "new-password")
            .returning(|_| Err(PortError::Unexpected("502".to_string())));
        api.expect_confirm_email()
            .withf(|user_id, token| user_id == "user-1" && token == "tok")
            .returning(|_, _| Err(PortError::Rejected("Token expired".to_string())));
        api.expect_forgot_password()
            .returning(|_| Err(PortError::Unavailable("offline".to_string())));
        let (client, _) = client(api);

        let reset = client.reset_password("a@b.co", "tok", "new-password").await;
        let confirm = client.confirm_email("user-1", "tok").await;
        let forgot = client.forgot_password("a@b.co").await;

        assert_eq!(reset.unwrap_err().message, "Password reset failed");
        assert_eq!(confirm.unwrap_err().message, "Token expired");
        assert_eq!(forgot.unwrap_err().message, "Password reset request failed");
    }

    #[rstest]
    #[tokio::test]
    async fn logout_clears_session_and_returns_to_auth() {
        let mut api = MockAuthApi::new();
        api.expect_login()
            .returning(|_| Ok(successful_login(None, &["USER"])));
        let (client, navigator) = client(api);
        client.login("a@b.co", "pw").await.unwrap();

        client.logout();

        assert!(!client.is_authenticated());
        assert!(!client.has_role("USER"));
        assert_eq!(navigator.visited().last().map(String::as_str), Some("/auth"));
    }
}
