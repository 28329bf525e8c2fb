//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the question-answering and health
//! endpoints, shared response types, and the master definition for the
//! OpenAPI specification.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::ApiError;
use crate::web::history::CitationDto;
use crate::web::state::AppState;
use policy_portal_core::ports::PortError;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::whoami_handler,
        ask_handler,
        crate::web::history::save_conversation_handler,
        crate::web::history::list_conversations_handler,
        crate::web::history::get_conversation_handler,
        crate::web::history::delete_conversation_handler,
        crate::web::admin::upload_documents_handler,
        crate::web::admin::reingest_handler,
        health_handler,
    ),
    components(
        schemas(
            SuccessResponse,
            AskRequest,
            AskResponse,
            HealthResponse,
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::WhoamiResponse,
            crate::web::history::TurnRoleDto,
            crate::web::history::CitationDto,
            crate::web::history::TurnDto,
            crate::web::history::SaveConversationRequest,
            crate::web::history::SaveConversationResponse,
            crate::web::history::ConversationSummaryDto,
            crate::web::history::ConversationDto,
            crate::web::admin::UploadForm,
        )
    ),
    tags(
        (name = "Policy Portal API", description = "API endpoints for the policy question-answering portal.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload for operations that only report success.
#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Serialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<CitationDto>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// POST /ask - Relay a question to the Answering Service
///
/// The question is forwarded verbatim and the answer plus citation list is
/// relayed unchanged. No caching, no rate limiting; an upstream failure
/// surfaces as a single retryable error and mutates nothing.
#[utoipa::path(
    post,
    path = "/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "The answer with citations", body = AskResponse),
        (status = 400, description = "Empty question"),
        (status = 401, description = "Not authenticated"),
        (status = 502, description = "Answering service unavailable")
    )
)]
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.question.trim().is_empty() {
        return Err(PortError::Validation("Question must not be empty".to_string()).into());
    }

    let answer = state.answering.ask(&req.question).await?;

    Ok(Json(AskResponse {
        answer: answer.answer,
        sources: answer
            .sources
            .into_iter()
            .map(CitationDto::from_domain)
            .collect(),
    }))
}

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
