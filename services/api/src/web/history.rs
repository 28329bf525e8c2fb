//! services/api/src/web/history.rs
//!
//! Conversation history endpoints: save, list, get, and delete. Every
//! operation is scoped to the authenticated principal's own collection.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::SuccessResponse;
use crate::web::state::AppState;
use policy_portal_core::domain::{
    Citation, Conversation, ConversationTurn, Principal, TurnRole,
};
use policy_portal_core::ports::PortError;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TurnRoleDto {
    Question,
    Answer,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CitationDto {
    pub document_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TurnDto {
    pub role: TurnRoleDto,
    pub content: String,
    #[serde(default)]
    pub sources: Vec<CitationDto>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveConversationRequest {
    pub turns: Vec<TurnDto>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveConversationResponse {
    pub id: Uuid,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryDto {
    pub id: Uuid,
    pub preview: String,
    pub message_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDto {
    pub id: Uuid,
    pub turns: Vec<TurnDto>,
    pub created_at: DateTime<Utc>,
}

//=========================================================================================
// Wire <-> Domain Conversions
//=========================================================================================

impl CitationDto {
    pub(crate) fn to_domain(self) -> Citation {
        Citation {
            document_name: self.document_name,
            page: self.page,
        }
    }

    pub(crate) fn from_domain(citation: Citation) -> Self {
        Self {
            document_name: citation.document_name,
            page: citation.page,
        }
    }
}

impl TurnDto {
    fn to_domain(self) -> ConversationTurn {
        ConversationTurn {
            role: match self.role {
                TurnRoleDto::Question => TurnRole::Question,
                TurnRoleDto::Answer => TurnRole::Answer,
            },
            content: self.content,
            sources: self.sources.into_iter().map(CitationDto::to_domain).collect(),
        }
    }

    fn from_domain(turn: ConversationTurn) -> Self {
        Self {
            role: match turn.role {
                TurnRole::Question => TurnRoleDto::Question,
                TurnRole::Answer => TurnRoleDto::Answer,
            },
            content: turn.content,
            sources: turn
                .sources
                .into_iter()
                .map(CitationDto::from_domain)
                .collect(),
        }
    }
}

impl ConversationDto {
    fn from_domain(conversation: Conversation) -> Self {
        Self {
            id: conversation.id,
            created_at: conversation.created_at,
            turns: conversation
                .turns
                .into_iter()
                .map(TurnDto::from_domain)
                .collect(),
        }
    }
}

/// Conversation ids are opaque to callers; a malformed id behaves exactly
/// like a missing one.
fn parse_conversation_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id)
        .map_err(|_| PortError::NotFound("Conversation not found".to_string()).into())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /history - Save a snapshot of the current conversation
#[utoipa::path(
    post,
    path = "/history",
    request_body = SaveConversationRequest,
    responses(
        (status = 200, description = "Conversation saved", body = SaveConversationResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn save_conversation_handler(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<SaveConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let turns = req.turns.into_iter().map(TurnDto::to_domain).collect();
    let conversation = state.conversations.save(&principal.email, turns).await?;
    Ok(Json(SaveConversationResponse {
        id: conversation.id,
    }))
}

/// GET /history - List the principal's saved conversations, in insertion order
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Conversation summaries", body = [ConversationSummaryDto]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_conversations_handler(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let summaries = state.conversations.list(&principal.email).await?;
    let body: Vec<ConversationSummaryDto> = summaries
        .into_iter()
        .map(|s| ConversationSummaryDto {
            id: s.id,
            preview: s.preview,
            message_count: s.message_count,
            timestamp: s.created_at,
        })
        .collect();
    Ok(Json(body))
}

/// GET /history/{id} - Fetch one saved conversation
#[utoipa::path(
    get,
    path = "/history/{id}",
    params(
        ("id" = String, Path, description = "The conversation id")
    ),
    responses(
        (status = 200, description = "The conversation", body = ConversationDto),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such conversation in the caller's collection")
    )
)]
pub async fn get_conversation_handler(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;
    let conversation = state
        .conversations
        .get(&principal.email, conversation_id)
        .await?;
    Ok(Json(ConversationDto::from_domain(conversation)))
}

/// DELETE /history/{id} - Permanently delete one saved conversation
#[utoipa::path(
    delete,
    path = "/history/{id}",
    params(
        ("id" = String, Path, description = "The conversation id")
    ),
    responses(
        (status = 200, description = "Conversation deleted", body = SuccessResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such conversation in the caller's collection")
    )
)]
pub async fn delete_conversation_handler(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let conversation_id = parse_conversation_id(&id)?;
    state
        .conversations
        .delete(&principal.email, conversation_id)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}
