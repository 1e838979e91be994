//! Flattened chunk rows for downstream stores.

use serde::{Deserialize, Serialize};

use crate::chunking::ChunkingOutcome;
use crate::document::Document;
use crate::types::IngestError;

/// A store-agnostic row: one chunk with its provenance, ready for a vector
/// store, search index, or plain file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    /// Source URL, or empty for in-memory input.
    pub source: String,
    /// Heading context joined with `" > "`.
    pub heading: String,
    /// Zero-based position of the chunk within its document.
    pub chunk_index: usize,
    pub content: String,
    pub metadata: serde_json::Value,
}

/// Flattens a chunking outcome into records, one per chunk.
pub fn ingestion_to_records(
    document: &Document,
    outcome: &ChunkingOutcome,
) -> Result<Vec<ChunkRecord>, IngestError> {
    let source = document.source_str().to_string();
    outcome
        .chunks
        .iter()
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let heading = chunk.metadata.heading_hierarchy.join(" > ");
            let metadata = serde_json::to_value(&chunk.metadata)
                .map_err(|err| IngestError::Chunking(err.to_string()))?;
            Ok(ChunkRecord {
                id: chunk.id.to_string(),
                source: source.clone(),
                heading,
                chunk_index,
                content: chunk.content.clone(),
                metadata,
            })
        })
        .collect()
}
