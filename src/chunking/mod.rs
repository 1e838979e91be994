//! Structure-aware chunking of extracted documents.
//!
//! The pipeline runs in two passes: [`segmenter`] walks the parsed content
//! into ordered [`Segment`](segmenter::Segment)s that carry their live
//! heading path, then [`assembly`] packs segments into retrieval-sized
//! chunks under a token budget.

pub mod assembly;
pub mod config;
pub mod segmenter;
pub mod tokenizer;
pub mod types;

use async_trait::async_trait;

use crate::types::IngestError;

pub use config::ChunkingConfig;
pub use segmenter::{Segment, SegmentKind};
pub use types::{Chunk, ChunkMetadata, ChunkingOutcome, ChunkingStats};

/// Implemented by concrete chunkers.
#[async_trait]
pub trait Chunker: Send + Sync {
    /// Chunks cleaned, structure-preserving content.
    async fn chunk(
        &self,
        content: &str,
        config: &ChunkingConfig,
    ) -> Result<ChunkingOutcome, IngestError>;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Chunker that follows the document's own structure: headings open new
/// chunks, paragraphs and list items never split mid-segment unless a single
/// segment exceeds the token budget on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct StructureChunker;

impl StructureChunker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Chunker for StructureChunker {
    async fn chunk(
        &self,
        content: &str,
        config: &ChunkingConfig,
    ) -> Result<ChunkingOutcome, IngestError> {
        let segments = segmenter::segment_fragment(content);
        Ok(assembly::assemble(&segments, config))
    }

    fn name(&self) -> &'static str {
        "structure"
    }
}
