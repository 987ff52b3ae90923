//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{auth::GoTrueAuthAdapter, d1::D1NotesRepository, db::PgNotesRepository},
    build_router,
    config::{Config, NotesBackend},
    cors_layer,
    error::ApiError,
    web::{notes::ApiDoc, state::AppState},
};
use axum::Router;
use notes_core::ports::NotesRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Build the Repository for the Configured Backend ---
    let repo: Arc<dyn NotesRepository> = match config.backend {
        NotesBackend::Postgres => {
            let database_url = config
                .database_url
                .as_ref()
                .ok_or_else(|| ApiError::Internal("DATABASE_URL is required".to_string()))?;
            info!("Connecting to Postgres...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let repo = PgNotesRepository::new(db_pool);
            info!("Running database migrations...");
            repo.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(repo)
        }
        NotesBackend::D1 => {
            let endpoint = config
                .d1_endpoint
                .clone()
                .ok_or_else(|| ApiError::Internal("D1_ENDPOINT is required".to_string()))?;
            let api_token = config
                .d1_api_token
                .clone()
                .ok_or_else(|| ApiError::Internal("D1_API_TOKEN is required".to_string()))?;
            info!("Using the D1 SQL-over-HTTP backend at {}", endpoint);
            Arc::new(D1NotesRepository::new(
                reqwest::Client::new(),
                endpoint,
                api_token,
            ))
        }
    };

    // --- 3. Initialize the Auth Adapter ---
    let auth = Arc::new(GoTrueAuthAdapter::new(
        reqwest::Client::new(),
        config.auth_url.clone(),
        config.auth_anon_key.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        repo,
        auth,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let api_router = build_router(app_state).layer(cors_layer(&config.cors_origin));

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
