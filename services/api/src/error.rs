//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use crate::config::ConfigError;
use policy_portal_core::ports::PortError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The request carried no session cookie, or one that no longer resolves.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The session is valid but the principal's role does not permit the
    /// operation. Decided locally, never forwarded upstream.
    #[error("Forbidden")]
    Forbidden,

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status and user-facing message for this error.
    ///
    /// Messages are deliberately generic: a missing conversation and one
    /// owned by someone else produce byte-identical responses, and upstream
    /// details stay in the server log.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::Port(PortError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
            ApiError::Port(PortError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ApiError::Port(PortError::EmailAlreadyRegistered) => (
                StatusCode::BAD_REQUEST,
                "Email already registered".to_string(),
            ),
            ApiError::Port(PortError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Port(PortError::Upstream(_)) => (
                StatusCode::BAD_GATEWAY,
                "Answering service unavailable".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
