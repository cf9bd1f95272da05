//! Unified error types for the triangle scanner.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the triangle scanner.
#[derive(Error, Debug)]
pub enum TriArbError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration was loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A tradeable symbol could not be parsed into a pair.
    #[error("pair error: {0}")]
    Pair(#[from] PairError),

    /// Exchange fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Triangle set persistence error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing an exchange symbol into a pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PairError {
    /// The symbol has no `_` delimiter.
    #[error("symbol {symbol:?} has no '_' delimiter")]
    MissingDelimiter {
        /// The offending symbol.
        symbol: String,
    },

    /// One side of the symbol is empty.
    #[error("symbol {symbol:?} has an empty base or quote")]
    EmptyCoin {
        /// The offending symbol.
        symbol: String,
    },
}

/// Exchange fetch errors.
///
/// A fetch always yields either a value or one of these; "no data" is never
/// reported as an empty result.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The exchange answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body could not be decoded into the expected shape.
    #[error("malformed response body: {0}")]
    Malformed(String),
}

/// Triangle set persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The triangle file does not exist yet.
    #[error("triangle set not found at {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Reading or writing the file failed.
    #[error("io error on {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File content is not a valid triangle set.
    #[error("invalid triangle set in {}: {source}", path.display())]
    Json {
        /// File being decoded.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, TriArbError>;
