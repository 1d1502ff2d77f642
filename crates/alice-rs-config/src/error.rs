//! Config error type.

use thiserror::Error;

/// Failure while reading, parsing, or validating an Alice config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config layer could not be read from disk.
    #[error("cannot read config file: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A config layer is not valid JSON5.
    #[error("config is not valid json5: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged document does not fit the config model.
    #[error("config does not match the expected shape: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field is unknown, mistyped, or out of range.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// A constraint spanning several fields was violated.
    #[error("invalid config: {0}")]
    Invalid(String),
}
