//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::rate_limit::RateLimiter;
use launchpad_core::ports::{
    DatabaseService, IdeaRefinementService, IdeaScoringService, SharedClock,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    /// Absent when no OpenAI key is configured.
    pub refiner: Option<Arc<dyn IdeaRefinementService>>,
    pub scorer: Arc<dyn IdeaScoringService>,
    pub clock: SharedClock,
    pub login_limiter: Arc<RateLimiter>,
    pub submission_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wires the limiters to the same clock as the rest of the state.
    pub fn new(
        db: Arc<dyn DatabaseService>,
        config: Arc<Config>,
        refiner: Option<Arc<dyn IdeaRefinementService>>,
        scorer: Arc<dyn IdeaScoringService>,
        clock: SharedClock,
    ) -> Self {
        Self {
            login_limiter: Arc::new(RateLimiter::admin_login(clock.clone())),
            submission_limiter: Arc::new(RateLimiter::idea_submissions(clock.clone())),
            db,
            config,
            refiner,
            scorer,
            clock,
        }
    }
}
