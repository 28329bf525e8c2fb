//! services/api/src/web/admin.rs
//!
//! Administrative knowledge-base endpoints: document upload and index
//! rebuild. Both sit behind the admin-role middleware; the documents
//! themselves are opaque binary content forwarded to the Answering Service.

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::rest::SuccessResponse;
use crate::web::state::AppState;
use policy_portal_core::domain::UploadedDocument;
use policy_portal_core::ports::PortError;

/// Marker schema so the multipart request body renders in the OpenAPI spec.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(format = Binary, value_type = String)]
    file: String,
}

/// POST /admin/upload - Forward source documents to the Answering Service
///
/// Accepts a multipart/form-data request with one or more file parts. Files
/// are forwarded in order; if any file fails, the whole call fails and the
/// admin retries. Uploading never triggers a rebuild by itself, so several
/// uploads can be batched before one reingest.
#[utoipa::path(
    post,
    path = "/admin/upload",
    request_body(content_type = "multipart/form-data", content = UploadForm, description = "The documents to upload."),
    responses(
        (status = 200, description = "All documents forwarded", body = SuccessResponse),
        (status = 400, description = "No file in the form"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
        (status = 502, description = "Answering service rejected an upload")
    )
)]
pub async fn upload_documents_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read multipart data: {}", e)))?
    {
        // Non-file form fields are ignored.
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read file bytes: {}", e)))?;
        documents.push(UploadedDocument {
            file_name,
            content: data.to_vec(),
        });
    }

    if documents.is_empty() {
        return Err(PortError::Validation(
            "Multipart form must include at least one file".to_string(),
        )
        .into());
    }

    for document in documents {
        info!("Forwarding document '{}' to the answering service", document.file_name);
        state.answering.upload_document(document).await?;
    }

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /admin/reingest - Trigger a rebuild of the searchable index
///
/// Fire-and-trigger: the Answering Service rebuilds from whatever documents
/// it currently holds, and only the acceptance of the trigger is reported.
#[utoipa::path(
    post,
    path = "/admin/reingest",
    responses(
        (status = 200, description = "Rebuild triggered", body = SuccessResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin"),
        (status = 502, description = "Answering service rejected the trigger")
    )
)]
pub async fn reingest_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state.answering.reingest().await?;
    info!("Knowledge-base reingest triggered");
    Ok(Json(SuccessResponse { success: true }))
}
