pub mod admin;
pub mod auth;
pub mod history;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::ApiError;
use state::AppState;

pub use middleware::{require_admin, require_auth};

/// Builds the complete API router: public auth routes, session-protected
/// routes, and admin-only routes, with CORS and a body limit for uploads.
pub fn api_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let allowed_origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required). Logout stays public so that logging
    // out with a dead session is not an error.
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/health", get(rest::health_handler));

    // Protected routes (valid session required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::whoami_handler))
        .route("/ask", post(rest::ask_handler))
        .route(
            "/history",
            post(history::save_conversation_handler).get(history::list_conversations_handler),
        )
        .route(
            "/history/{id}",
            get(history::get_conversation_handler).delete(history::delete_conversation_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    // Admin routes (valid session and admin role required). Layers run
    // outermost-first, so require_auth is applied last here.
    let admin_routes = Router::new()
        .route("/admin/upload", post(admin::upload_documents_handler))
        .route("/admin/reingest", post(admin::reingest_handler))
        .layer(axum_middleware::from_fn(middleware::require_admin))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state))
}
