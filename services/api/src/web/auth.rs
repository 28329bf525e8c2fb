//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, logout, and whoami.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::SuccessResponse;
use crate::web::state::AppState;
use policy_portal_core::domain::{Principal, Role};
use policy_portal_core::ports::PortError;

/// Sessions are valid for a fixed seven days from issuance.
const SESSION_TTL_DAYS: i64 = 7;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct WhoamiResponse {
    pub email: String,
    pub role: String,
}

//=========================================================================================
// Password and Cookie Helpers
//=========================================================================================

/// Hashes a password with argon2 for storage in the principal registry.
/// Also used at startup to provision the admin account.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })
}

/// Extracts the session token from the request's `Cookie` header, if any.
pub(crate) fn session_token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .find_map(|c| c.trim().strip_prefix("session="))
        })
}

/// Creates a new session for the principal and returns the `Set-Cookie` value.
/// The token is an opaque capability reference resolved against the
/// server-side session table; no auth content is decodable by the client.
async fn issue_session(state: &AppState, principal: Principal) -> Result<String, ApiError> {
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
    state.sessions.create(&token, principal, expires_at).await?;

    Ok(format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        token,
        Duration::days(SESSION_TTL_DAYS).num_seconds()
    ))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new parent account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = SuccessResponse),
        (status = 400, description = "Missing field or email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(PortError::Validation("Email and password required".to_string()).into());
    }

    let password_hash = hash_password(&req.password)?;

    // Signup only ever creates parents; admin accounts are provisioned
    // out-of-band at startup.
    let principal = state
        .principals
        .register(&req.email, &password_hash, Role::Parent)
        .await?;

    let cookie = issue_session(&state, principal).await?;

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(SuccessResponse { success: true }),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = SuccessResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown email and wrong password are indistinguishable to the caller.
    let creds = state
        .principals
        .find_credentials(&req.email)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => PortError::InvalidCredentials,
            other => other,
        })?;

    let parsed_hash = PasswordHash::new(&creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(PortError::InvalidCredentials.into());
    }

    let principal = Principal {
        email: creds.email,
        role: creds.role,
    };
    let cookie = issue_session(&state, principal).await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SuccessResponse { success: true }),
    ))
}

/// POST /auth/logout - Logout and invalidate the session
///
/// Idempotent: logging out without a session, or twice, is not an error.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session revoked, cookie cleared", body = SuccessResponse)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = session_token_from_headers(&headers) {
        state.sessions.revoke(token).await?;
    }

    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(SuccessResponse { success: true }),
    ))
}

/// GET /auth/me - The authenticated principal behind the session cookie
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The current principal", body = WhoamiResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn whoami_handler(Extension(principal): Extension<Principal>) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        email: principal.email,
        role: principal.role.to_string(),
    })
}
