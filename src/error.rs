//! Error types.
//!
//! Nothing inside an aggregation cycle is recoverable: missing session data
//! simply yields no records. These errors cover construction-time inputs
//! (configuration, certificate material) and checked report insertion.

use thiserror::Error;

/// Errors raised while loading collector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid collector config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cache lifetime of {ms} ms does not fit in microseconds")]
    LifetimeOutOfRange { ms: u64 },
}

/// Errors raised while building certificate chains.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("certificate chain is empty")]
    EmptyChain,

    #[error("malformed PEM certificate bundle: {0}")]
    Pem(#[source] std::io::Error),
}

/// Errors raised while starting execution domains.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("failed to spawn {name} domain thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by checked report operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("duplicate stats id: {0}")]
    DuplicateId(String),
}
