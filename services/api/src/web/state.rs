//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use crate::config::Config;
use policy_portal_core::ports::{
    AnsweringService, ConversationRepository, PrincipalRegistry, SessionStore,
};

/// The shared application state, created once at startup and passed to all handlers.
///
/// The three store ports are typically backed by one `MemoryStore`, but each
/// handler only ever sees the port it needs.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub principals: Arc<dyn PrincipalRegistry>,
    pub sessions: Arc<dyn SessionStore>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub answering: Arc<dyn AnsweringService>,
}
