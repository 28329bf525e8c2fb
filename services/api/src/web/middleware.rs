//! services/api/src/web/middleware.rs
//!
//! Authentication and authorization middleware for protecting routes.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::auth::session_token_from_headers;
use crate::web::state::AppState;
use policy_portal_core::domain::{Principal, Role};

/// Middleware that validates the session cookie and extracts the principal.
///
/// If valid, inserts the `Principal` into request extensions for handlers to
/// use. If missing, unknown, or expired, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token_from_headers(req.headers())
        .map(str::to_string)
        .ok_or(ApiError::NotAuthenticated)?;

    let principal = state
        .sessions
        .resolve(&token)
        .await
        .map_err(|_| ApiError::NotAuthenticated)?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Middleware that rejects non-admin principals with 403 Forbidden.
///
/// Must be layered inside `require_auth`, which puts the `Principal` into
/// request extensions. A Forbidden response is distinct from 401: the caller
/// is authenticated but lacks the role.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(ApiError::NotAuthenticated)?;

    if principal.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}
