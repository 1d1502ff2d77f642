//! Shared conversation types and collaborator contracts for Alice.
//!
//! The memory engine, the configuration layer, and any front-end all speak
//! in terms of the types defined here.

mod conversation;
mod insights;
mod model;

pub use conversation::{Conversation, ConversationId, ConversationTurn, Role, TurnId};
pub use insights::{ConversationInsights, Sentiment};
pub use model::{LanguageModel, MemoryFact, ModelError, ModelRequest};
