pub mod domain;
pub mod ports;

pub use domain::{
    Answer, AuthSession, Citation, Conversation, ConversationSummary, ConversationTurn,
    Credentials, Principal, Role, TurnRole, UploadedDocument,
};
pub use ports::{
    AnsweringService, ConversationRepository, PortError, PortResult, PrincipalRegistry,
    SessionStore,
};
