//! Test helpers shared across Alice crates.

pub mod llm;
pub mod memory;

pub use llm::{FailingModel, FixedModel, RecordingModel};
pub use memory::{FailingProvider, InMemoryProvider};
