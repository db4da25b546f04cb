pub mod admin;
pub mod client_ip;
pub mod ideas;
pub mod middleware;
pub mod newsletter;
pub mod rate_limit;
pub mod rest;
pub mod routes;
pub mod session_cookie;
pub mod state;

// Re-export the router builder and the middleware so the binary and the
// integration tests can assemble the application.
pub use middleware::require_admin;
pub use rate_limit::{rate_limit, RateLimiter};
pub use routes::create_router;
pub use state::AppState;
