//! Chunk data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::segmenter::SegmentKind;

/// A retrieval-ready slice of a document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub content: String,
    /// Estimated token count of `content`.
    pub token_count: usize,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: String, token_count: usize, metadata: ChunkMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            token_count,
            metadata,
        }
    }
}

/// Context attached to each chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Heading path of the chunk's first segment, outermost first.
    pub heading_hierarchy: Vec<String>,
    /// Kind of the chunk's first document segment (carried overlap text
    /// does not count).
    pub kind: SegmentKind,
    /// Number of document segments packed into the chunk.
    pub segment_count: usize,
}

/// The result of chunking one document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChunkingOutcome {
    pub chunks: Vec<Chunk>,
    pub stats: ChunkingStats,
}

/// Aggregate numbers for logging and telemetry.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ChunkingStats {
    pub total_segments: usize,
    pub total_chunks: usize,
    pub average_tokens: f32,
}
