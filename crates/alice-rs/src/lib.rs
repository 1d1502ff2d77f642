//! Public SDK surface for Alice.
//!
//! This crate re-exports the core building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use alice_rs_config as config;
pub use alice_rs_core as core;
/// Re-export for convenience.
pub use alice_rs_memory as memory;
/// Re-export for convenience.
pub use alice_rs_protocol as protocol;

pub use alice_rs_config::AliceConfig;
pub use alice_rs_core::{AliceCoreError, Assistant, MemoryEchoModel, Session, TurnOutcome};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// No-op otherwise.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
