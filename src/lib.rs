//! # html-ingestor
//!
//! HTML ingestion that preserves semantic structure, producing RAG-friendly
//! documents and chunks.
//!
//! ```text
//! Raw HTML ──► parser::metadata (title / description / main region)
//!           └► parser::structure ──► cleaned semantic text
//!
//! Cleaned text ──► chunking::segmenter ──► ordered segments
//!                               │
//!                               └─► chunking::assembly ──► ChunkingOutcome
//!
//! ChunkingOutcome ──► ingestion::records ──► ingestion::sink (JSONL, ...)
//!
//! Remote pages ──► ingestion::{Fetcher, DocumentCache, IngestLedger}
//! ```
//!
//! The quickest path is [`ingest_html`]:
//!
//! ```no_run
//! # async fn run() -> Result<(), html_ingestor::IngestError> {
//! let result = html_ingestor::ingest_html(
//!     "<h1>Guide</h1><p>Everything worth knowing.</p>",
//! )
//! .await?;
//!
//! for chunk in &result.outcome.chunks {
//!     println!("[{}] {}", chunk.metadata.heading_hierarchy.join(" > "), chunk.content);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! For tuned pipelines, build an [`Ingestor`] with a custom
//! [`ChunkingConfig`] or [`Chunker`] implementation.

pub mod chunking;
pub mod document;
pub mod ingestion;
pub mod parser;
pub mod service;
pub mod types;

pub use chunking::{
    Chunk, ChunkMetadata, Chunker, ChunkingConfig, ChunkingOutcome, ChunkingStats,
    StructureChunker,
};
pub use document::Document;
pub use ingestion::{ChunkRecord, ChunkSink, DocumentCache, Fetcher, IngestLedger, JsonlSink};
pub use parser::{PageMetadata, StructureParser};
pub use service::{IngestTelemetry, Ingestion, Ingestor, IngestorBuilder, ingest_html};
pub use types::IngestError;
