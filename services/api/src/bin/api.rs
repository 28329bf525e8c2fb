//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{answering::HttpAnsweringAdapter, memory::MemoryStore},
    config::Config,
    error::ApiError,
    web::{self, auth::hash_password, rest::ApiDoc, state::AppState},
};
use axum::Router;
use policy_portal_core::domain::Role;
use policy_portal_core::ports::PrincipalRegistry;
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

    // --- 2. Initialize Stores & Provision the Admin Account ---
    // State is in-memory and lost on restart; the store ports are the seam
    // for a durable replacement.
    let store = Arc::new(MemoryStore::new());

    // Admin accounts are provisioned out-of-band here, never through signup.
    let admin_hash = hash_password(&config.admin_password)?;
    store
        .register(&config.admin_email, &admin_hash, Role::Admin)
        .await?;
    info!("Provisioned admin account for {}", config.admin_email);

    // --- 3. Initialize the Answering Service Adapter ---
    let http_client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .map_err(|e| ApiError::Internal(format!("Failed to build HTTP client: {}", e)))?;
    let answering = Arc::new(HttpAnsweringAdapter::new(
        http_client,
        config.backend_url.clone(),
    ));
    info!("Answering service at {}", config.backend_url);

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        principals: store.clone(),
        sessions: store.clone(),
        conversations: store,
        answering,
    });

    // --- 5. Create the Web Router ---
    let api_router = web::api_router(app_state)?;

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
