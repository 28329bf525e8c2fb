//! crates/policy_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Answer, Conversation, ConversationSummary, ConversationTurn, Credentials, Principal, Role,
    UploadedDocument,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, storage).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email already registered")]
    EmailAlreadyRegistered,
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The registry of known principals, keyed by email.
///
/// Principals are created at signup (parents) or provisioned at startup
/// (admins); this layer never deletes them.
#[async_trait]
pub trait PrincipalRegistry: Send + Sync {
    /// Registers a new principal. Fails with `EmailAlreadyRegistered` if the
    /// email is already taken.
    async fn register(
        &self,
        email: &str,
        hashed_password: &str,
        role: Role,
    ) -> PortResult<Principal>;

    /// Looks up the stored credentials for an email. Fails with `NotFound`
    /// for unknown emails; the caller decides how to surface that.
    async fn find_credentials(&self, email: &str) -> PortResult<Credentials>;
}

/// The live session table, mapping opaque tokens to authenticated principals.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(
        &self,
        token: &str,
        principal: Principal,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a token to its principal. Unknown and expired tokens fail
    /// identically with `NotFound`.
    async fn resolve(&self, token: &str) -> PortResult<Principal>;

    /// Invalidates a session. Idempotent: revoking an unknown token succeeds.
    async fn revoke(&self, token: &str) -> PortResult<()>;
}

/// The store of saved conversations, keyed by owner email.
///
/// Every operation takes the acting principal's email; the implementation
/// must enforce ownership on each read and write path, so a caller can never
/// observe or mutate a conversation it does not own. A nonexistent id and an
/// id owned by someone else must be indistinguishable to the caller.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Appends a new conversation snapshot and returns it, id included.
    async fn save(
        &self,
        owner_email: &str,
        turns: Vec<ConversationTurn>,
    ) -> PortResult<Conversation>;

    /// All conversations owned by the principal, in insertion order.
    async fn list(&self, owner_email: &str) -> PortResult<Vec<ConversationSummary>>;

    async fn get(&self, owner_email: &str, conversation_id: Uuid) -> PortResult<Conversation>;

    /// Immediate, irreversible deletion. Same ownership rule as `get`.
    async fn delete(&self, owner_email: &str, conversation_id: Uuid) -> PortResult<()>;
}

/// The external Answering Service: retrieval, answer generation, and document
/// storage are all behind this boundary and opaque to the core.
#[async_trait]
pub trait AnsweringService: Send + Sync {
    /// Forwards a question verbatim and relays the answer unchanged.
    async fn ask(&self, question: &str) -> PortResult<Answer>;

    /// Forwards one document as opaque binary content to the service's
    /// storage. Does not trigger a rebuild.
    async fn upload_document(&self, document: UploadedDocument) -> PortResult<()>;

    /// Triggers a rebuild of the searchable index from whatever documents the
    /// service currently holds. Fire-and-trigger: only the acceptance of the
    /// request itself is reported.
    async fn reingest(&self) -> PortResult<()>;
}
