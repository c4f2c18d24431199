//! Error types for the musepop-core library.

use thiserror::Error;

/// Main error type for the musepop library.
#[derive(Error, Debug)]
pub enum MusepopError {
    /// Table/statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Upstream fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to work on yet; the earlier pipeline stages must run first.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while recovering records from an upstream document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No table carries the required column signature.
    #[error("no table with museum, city and visitor columns among {tables_seen} tables")]
    StructureNotFound { tables_seen: usize },

    /// The document was located but produced no usable record.
    #[error("no records could be extracted")]
    NoData,

    /// Upstream payload lacked an expected field.
    #[error("missing field in upstream payload: {0}")]
    MissingField(String),
}

/// Recoverable transport-level failures.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            FetchError::Decode {
                url,
                reason: err.to_string(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Errors related to the storage collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing a table file failed.
    #[error("table {table}: {source}")]
    Io {
        table: String,
        #[source]
        source: std::io::Error,
    },

    /// A table could not be (de)serialized.
    #[error("table {table}: {source}")]
    Serialize {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for the musepop library.
pub type Result<T> = std::result::Result<T, MusepopError>;
