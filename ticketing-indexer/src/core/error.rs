//! Centralized error types for the ticketing indexer

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main indexer error type
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{kind} not found: {address}")]
    NotFound { kind: &'static str, address: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl IndexerError {
    pub fn not_found(kind: &'static str, address: impl ToString) -> Self {
        IndexerError::NotFound {
            kind,
            address: address.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexerError::NotFound { .. })
    }
}

/// A record could not be decoded against the requested schema.
///
/// Always recoverable: the offending account is skipped by batch readers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to decode {schema} account ({len} bytes): {reason}")]
pub struct DecodeError {
    pub schema: &'static str,
    pub len: usize,
    pub reason: DecodeFailure,
}

impl DecodeError {
    pub fn new(schema: &'static str, len: usize, reason: DecodeFailure) -> Self {
        Self { schema, len, reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeFailure {
    TooShort,
    DiscriminatorMismatch { expected: [u8; 8], found: [u8; 8] },
    Malformed(String),
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeFailure::TooShort => write!(f, "data shorter than discriminator"),
            DecodeFailure::DiscriminatorMismatch { expected, found } => {
                write!(f, "discriminator mismatch (expected {:?}, found {:?})", expected, found)
            }
            DecodeFailure::Malformed(reason) => write!(f, "malformed body: {}", reason),
        }
    }
}

/// Transport-level failure talking to the ledger node
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited by RPC node")]
    RateLimited,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Refresh aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Whether a caller-initiated retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::Transport(_) | FetchError::Timeout(_) | FetchError::RateLimited
        )
    }
}

/// Result type alias for indexer operations
pub type IndexerResult<T> = Result<T, IndexerError>;

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::InvalidResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for FetchError {
    fn from(err: base64::DecodeError) -> Self {
        FetchError::InvalidResponse(format!("account data is not valid base64: {}", err))
    }
}
