//! services/api/src/adapters/memory.rs
//!
//! This module contains the in-memory store adapter, which is the concrete
//! implementation of the `PrincipalRegistry`, `SessionStore`, and
//! `ConversationRepository` ports from the `core` crate. State lives in
//! process-wide maps and is lost on restart; the ports are the seam for a
//! durable replacement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use policy_portal_core::domain::{
    AuthSession, Conversation, ConversationSummary, ConversationTurn, Credentials, Principal, Role,
};
use policy_portal_core::ports::{
    ConversationRepository, PortError, PortResult, PrincipalRegistry, SessionStore,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An in-memory store adapter backing all three store ports.
///
/// Each map is keyed by the acting principal's own identity (email or session
/// token), and no operation ever writes under another principal's key.
#[derive(Default)]
pub struct MemoryStore {
    principals: RwLock<HashMap<String, Credentials>>,
    sessions: RwLock<HashMap<String, AuthSession>>,
    conversations: RwLock<HashMap<String, Vec<Conversation>>>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }
}

//=========================================================================================
// `PrincipalRegistry` Trait Implementation
//=========================================================================================

#[async_trait]
impl PrincipalRegistry for MemoryStore {
    async fn register(
        &self,
        email: &str,
        hashed_password: &str,
        role: Role,
    ) -> PortResult<Principal> {
        let mut principals = self.principals.write().await;
        if principals.contains_key(email) {
            return Err(PortError::EmailAlreadyRegistered);
        }
        principals.insert(
            email.to_string(),
            Credentials {
                email: email.to_string(),
                hashed_password: hashed_password.to_string(),
                role,
            },
        );
        Ok(Principal {
            email: email.to_string(),
            role,
        })
    }

    async fn find_credentials(&self, email: &str) -> PortResult<Credentials> {
        self.principals
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Principal {} not found", email)))
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(
        &self,
        token: &str,
        principal: Principal,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.sessions.write().await.insert(
            token.to_string(),
            AuthSession {
                id: token.to_string(),
                principal,
                expires_at,
            },
        );
        Ok(())
    }

    async fn resolve(&self, token: &str) -> PortResult<Principal> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if session.expires_at > Utc::now() => {
                    return Ok(session.principal.clone());
                }
                Some(_) => {} // expired, fall through to removal
                None => return Err(PortError::NotFound("Session not found".to_string())),
            }
        }
        // Expired sessions are dropped on resolve rather than by a sweeper.
        self.sessions.write().await.remove(token);
        Err(PortError::NotFound("Session not found".to_string()))
    }

    async fn revoke(&self, token: &str) -> PortResult<()> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

//=========================================================================================
// `ConversationRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ConversationRepository for MemoryStore {
    async fn save(
        &self,
        owner_email: &str,
        turns: Vec<ConversationTurn>,
    ) -> PortResult<Conversation> {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            owner_email: owner_email.to_string(),
            turns,
            created_at: Utc::now(),
        };
        self.conversations
            .write()
            .await
            .entry(owner_email.to_string())
            .or_default()
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn list(&self, owner_email: &str) -> PortResult<Vec<ConversationSummary>> {
        let conversations = self.conversations.read().await;
        let summaries = conversations
            .get(owner_email)
            .map(|owned| owned.iter().map(Conversation::summary).collect())
            .unwrap_or_default();
        Ok(summaries)
    }

    async fn get(&self, owner_email: &str, conversation_id: Uuid) -> PortResult<Conversation> {
        let conversations = self.conversations.read().await;
        conversations
            .get(owner_email)
            .and_then(|owned| owned.iter().find(|c| c.id == conversation_id))
            .cloned()
            .ok_or_else(|| PortError::NotFound("Conversation not found".to_string()))
    }

    async fn delete(&self, owner_email: &str, conversation_id: Uuid) -> PortResult<()> {
        let mut conversations = self.conversations.write().await;
        let owned = conversations
            .get_mut(owner_email)
            .ok_or_else(|| PortError::NotFound("Conversation not found".to_string()))?;
        let position = owned
            .iter()
            .position(|c| c.id == conversation_id)
            .ok_or_else(|| PortError::NotFound("Conversation not found".to_string()))?;
        owned.remove(position);
        Ok(())
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use policy_portal_core::domain::TurnRole;

    fn parent(email: &str) -> Principal {
        Principal {
            email: email.to_string(),
            role: Role::Parent,
        }
    }

    fn turns(count: usize) -> Vec<ConversationTurn> {
        (0..count)
            .map(|i| ConversationTurn {
                role: if i % 2 == 0 {
                    TurnRole::Question
                } else {
                    TurnRole::Answer
                },
                content: format!("turn {}", i),
                sources: Vec::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn register_then_find_credentials_roundtrip() {
        let store = MemoryStore::new();
        store
            .register("parent@example.com", "hash", Role::Parent)
            .await
            .unwrap();

        let creds = store.find_credentials("parent@example.com").await.unwrap();
        assert_eq!(creds.email, "parent@example.com");
        assert_eq!(creds.hashed_password, "hash");
        assert_eq!(creds.role, Role::Parent);
    }

    #[tokio::test]
    async fn register_duplicate_email_fails() {
        let store = MemoryStore::new();
        store
            .register("parent@example.com", "hash", Role::Parent)
            .await
            .unwrap();

        let err = store
            .register("parent@example.com", "other", Role::Parent)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::EmailAlreadyRegistered));
    }

    #[tokio::test]
    async fn emails_are_case_sensitive_identity_keys() {
        let store = MemoryStore::new();
        store
            .register("Parent@example.com", "hash", Role::Parent)
            .await
            .unwrap();

        let err = store.find_credentials("parent@example.com").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn session_resolve_and_revoke() {
        let store = MemoryStore::new();
        let expires = Utc::now() + Duration::days(7);
        store
            .create("token-1", parent("parent@example.com"), expires)
            .await
            .unwrap();

        let principal = store.resolve("token-1").await.unwrap();
        assert_eq!(principal.email, "parent@example.com");

        store.revoke("token-1").await.unwrap();
        assert!(store.resolve("token-1").await.is_err());

        // Revoking again is not an error.
        store.revoke("token-1").await.unwrap();
    }

    #[tokio::test]
    async fn expired_session_fails_like_an_unknown_one() {
        let store = MemoryStore::new();
        let expired = Utc::now() - Duration::minutes(1);
        store
            .create("stale", parent("parent@example.com"), expired)
            .await
            .unwrap();

        let err = store.resolve("stale").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        let err = store.resolve("never-existed").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn concurrent_sessions_for_one_principal_are_permitted() {
        let store = MemoryStore::new();
        let expires = Utc::now() + Duration::days(7);
        store
            .create("laptop", parent("parent@example.com"), expires)
            .await
            .unwrap();
        store
            .create("phone", parent("parent@example.com"), expires)
            .await
            .unwrap();

        assert!(store.resolve("laptop").await.is_ok());
        assert!(store.resolve("phone").await.is_ok());
    }

    #[tokio::test]
    async fn save_then_list_preserves_count_and_order() {
        let store = MemoryStore::new();
        let first = store.save("parent@example.com", turns(3)).await.unwrap();
        let second = store.save("parent@example.com", turns(1)).await.unwrap();

        let listed = store.list("parent@example.com").await.unwrap();
        assert_eq!(listed.len(), 2);
        // Insertion order.
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);
        assert_eq!(listed[0].message_count, 3);
        assert_eq!(listed[0].preview, "turn 0");
    }

    #[tokio::test]
    async fn delete_removes_the_conversation() {
        let store = MemoryStore::new();
        let saved = store.save("parent@example.com", turns(3)).await.unwrap();

        store.delete("parent@example.com", saved.id).await.unwrap();

        let err = store.get("parent@example.com", saved.id).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
        assert!(store.list("parent@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_owners_conversation_is_indistinguishable_from_missing() {
        let store = MemoryStore::new();
        let saved = store.save("alice@example.com", turns(2)).await.unwrap();

        let foreign = store.get("bob@example.com", saved.id).await.unwrap_err();
        let missing = store
            .get("bob@example.com", Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());

        let foreign = store.delete("bob@example.com", saved.id).await.unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());

        // Alice still owns her conversation untouched.
        assert_eq!(
            store.get("alice@example.com", saved.id).await.unwrap().id,
            saved.id
        );
    }
}
