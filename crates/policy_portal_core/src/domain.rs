//! crates/policy_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The role attached to an authenticated identity.
///
/// Admin accounts are provisioned out-of-band; signup only ever creates
/// parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Parent,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Parent => write!(f, "parent"),
        }
    }
}

/// An authenticated identity. The email is the unique, case-sensitive
/// identity key across the whole system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
    pub role: Role,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub principal: Principal,
    pub expires_at: DateTime<Utc>,
}

/// Whether a turn was spoken by the user or by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    Question,
    Answer,
}

/// A pointer into the document knowledge base backing an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub document_name: String,
    pub page: Option<u32>,
}

/// A single question or answer within a saved conversation.
/// `sources` is empty for question turns.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    pub sources: Vec<Citation>,
}

/// A saved, owned, ordered sequence of question/answer turns.
///
/// A conversation is a snapshot taken when the user explicitly saves an
/// in-progress chat; it is never auto-extended per turn afterwards.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub owner_email: String,
    pub turns: Vec<ConversationTurn>,
    pub created_at: DateTime<Utc>,
}

/// The listing view of a conversation, derived rather than stored.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub preview: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// The listing preview: the first turn's content, or a fixed placeholder
    /// when the conversation was saved with no turns.
    pub fn preview(&self) -> String {
        self.turns
            .first()
            .map(|turn| turn.content.clone())
            .unwrap_or_else(|| "Empty conversation".to_string())
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            preview: self.preview(),
            message_count: self.turns.len(),
            created_at: self.created_at,
        }
    }
}

/// An answer relayed from the external Answering Service.
#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<Citation>,
}

/// One uploaded source document, carried as opaque binary content on its way
/// to the Answering Service's storage.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: TurnRole, content: &str) -> ConversationTurn {
        ConversationTurn {
            role,
            content: content.to_string(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn preview_is_first_turn_content() {
        let convo = Conversation {
            id: Uuid::new_v4(),
            owner_email: "parent@example.com".to_string(),
            turns: vec![
                turn(TurnRole::Question, "What is the refund policy?"),
                turn(TurnRole::Answer, "Refunds are issued within 30 days."),
            ],
            created_at: Utc::now(),
        };

        let summary = convo.summary();
        assert_eq!(summary.preview, "What is the refund policy?");
        assert_eq!(summary.message_count, 2);
    }

    #[test]
    fn preview_of_empty_conversation_is_placeholder() {
        let convo = Conversation {
            id: Uuid::new_v4(),
            owner_email: "parent@example.com".to_string(),
            turns: Vec::new(),
            created_at: Utc::now(),
        };

        let summary = convo.summary();
        assert_eq!(summary.preview, "Empty conversation");
        assert_eq!(summary.message_count, 0);
    }
}
