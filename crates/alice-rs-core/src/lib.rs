//! Core engine for Alice.
//!
//! This crate owns fact detection and scoring, conversation analysis, reply
//! composition, and the assistant/session pair that ties them to the
//! memory store and a language model.

pub mod analyzer;
pub mod compose;
pub mod detector;
mod echo;
pub mod engine;
pub mod error;
mod hedge;
pub mod scorer;

pub use analyzer::ConversationAnalyzer;
pub use detector::{CandidateFact, FactDetector, FactRule};
/// Offline reply generator used when no inference backend is wired in.
pub use echo::MemoryEchoModel;
/// Assistant facade and per-conversation sessions.
pub use engine::{Assistant, Session, TurnOutcome};
pub use error::AliceCoreError;
pub use scorer::{FactScorer, ScoredFact};
