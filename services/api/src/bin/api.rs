//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{db::DbAdapter, refine_llm::OpenAiRefineAdapter, scoring::HttpScoringAdapter},
    config::Config,
    error::ApiError,
    web::{admin::seed_admin, create_router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use launchpad_core::ports::{IdeaRefinementService, SharedClock};
use mockable::DefaultClock;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    seed_admin(db_adapter.as_ref(), &config).await?;

    // --- 3. Initialize Service Adapters ---
    let refiner: Option<Arc<dyn IdeaRefinementService>> = match &config.openai_api_key {
        Some(key) => {
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(key));
            Some(Arc::new(OpenAiRefineAdapter::new(
                openai_client,
                config.refine_model.clone(),
            )))
        }
        None => {
            warn!("OPENAI_API_KEY is not set; idea refinement is disabled.");
            None
        }
    };

    let scorer = Arc::new(
        HttpScoringAdapter::new(
            config.scoring_api_url.clone(),
            config.scoring_api_timeout,
            config.scoring_api_accept_invalid_certs,
        )
        .map_err(|e| ApiError::Internal(format!("Failed to build the scoring client: {}", e)))?,
    );

    // --- 4. Build the Shared AppState ---
    let clock: SharedClock = Arc::new(DefaultClock);
    let app_state = Arc::new(AppState::new(
        db_adapter,
        config.clone(),
        refiner,
        scorer,
        clock,
    ));

    // --- 5. Create the Web Router ---
    let app = create_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
