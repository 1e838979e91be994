//! Shared error type for the ingestion pipeline.

use thiserror::Error;

/// Errors surfaced by parsing, chunking, fetching, and persistence.
#[derive(Debug, Error)]
pub enum IngestError {
    /// HTML could not be parsed or re-serialized.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// Chunk segmentation or assembly failed.
    #[error("chunking failed: {0}")]
    Chunking(String),

    /// The document was structurally unusable (bad URL, empty selector, ...).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Network-level fetch failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Sink or cache persistence failure.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Filesystem failure.
    #[error("io failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::InvalidDocument(err.to_string())
    }
}
