//! Error types for config loading, merging and validation.

use thiserror::Error;

/// Errors returned while resolving or validating bot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The caller supplied an invalid combination of inputs.
    #[error("invalid usage: {0}")]
    Usage(String),
    /// Reading a config or settings file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Parsing a YAML document failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] serde_yaml::Error),
    /// Converting JSON values into typed models failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A specific field failed schema validation.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Generic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Transport-level failure while fetching a remote override.
    #[error("failed to fetch config: {0}")]
    FetchFailed(#[from] reqwest::Error),
}
