//! Error types for the resolver
//!
//! Provider failures never show up here: the cascade and the catalog cache
//! absorb them and degrade to "skip" or "no match". What remains are caller
//! mistakes and startup problems.

use thiserror::Error;

/// Request-level errors surfaced to the caller
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Query is required")]
    EmptyQuery,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
