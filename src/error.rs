use thiserror::Error;

use crate::domain::id::TraderId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Fleet registry misuse. Always surfaced to the caller, never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("trader '{id}' is already registered")]
    DuplicateIdentifier { id: TraderId },

    #[error("trader '{id}' not found")]
    NotFound { id: TraderId },

    #[error("invalid config for trader '{id}': {reason}")]
    InvalidConfig { id: TraderId, reason: String },
}

/// Failures of a model provider invocation.
#[derive(Error, Debug)]
pub enum InvocationError {
    /// No credential configured. Fatal to the call, never retried.
    #[error("model provider not configured: {0}")]
    Configuration(String),

    /// Network-level failure that is expected to clear on its own.
    #[error("transient transport failure: {0}")]
    Transient(String),

    /// Transport failure that retrying will not fix.
    #[error("transport failure: {0}")]
    Permanent(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned no completions")]
    EmptyResponse,

    #[error("invocation failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<InvocationError>,
    },
}

impl InvocationError {
    /// Whether another attempt may succeed.
    ///
    /// Status errors are retried only when the provider body itself names a
    /// transient condition (e.g. an upstream gateway timeout).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Status { body, .. } => is_transient_message(body),
            Self::Configuration(_)
            | Self::Permanent(_)
            | Self::EmptyResponse
            | Self::Exhausted { .. } => false,
        }
    }
}

/// Substrings that mark a failure description as transient.
const TRANSIENT_INDICATORS: &[&str] = &[
    "unexpected end",
    "timeout",
    "timed out",
    "connection reset",
    "connection refused",
    "connection closed",
    "no such host",
    "dns error",
    "failed to lookup address",
    "temporary failure",
];

/// Indicators that only count as a whole word.
const TRANSIENT_WORDS: &[&str] = &["eof"];

/// Classify a failure description against the fixed transient indicator set.
#[must_use]
pub fn is_transient_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    TRANSIENT_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
        || lowered
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|word| TRANSIENT_WORDS.contains(&word))
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// Desired state could not be read; the reconciliation pass was aborted.
    #[error("failed to fetch desired state: {0}")]
    SnapshotFetch(#[source] Box<Error>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
