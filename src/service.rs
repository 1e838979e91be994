//! The public ingestion pipeline.

use std::sync::Arc;
use std::time::Instant;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::chunking::{Chunker, ChunkingConfig, ChunkingOutcome, StructureChunker};
use crate::document::Document;
use crate::ingestion::FetchOutcome;
use crate::parser::{metadata, PageMetadata, StructureParser};
use crate::types::IngestError;

/// Timing and volume numbers for one ingestion run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IngestTelemetry {
    /// Name of the chunker that ran.
    pub chunker: String,
    pub duration_ms: u64,
    pub chunk_count: usize,
    pub average_tokens: f32,
}

/// Everything produced by one ingestion: the document, its chunks, and
/// run telemetry.
#[derive(Clone, Debug)]
pub struct Ingestion {
    pub document: Document,
    pub outcome: ChunkingOutcome,
    pub telemetry: IngestTelemetry,
}

impl Ingestion {
    pub fn chunk_count(&self) -> usize {
        self.outcome.chunks.len()
    }
}

/// Configured ingestion pipeline: parse, extract structure, chunk.
///
/// Cheap to clone; the chunker is shared behind an `Arc`.
#[derive(Clone)]
pub struct Ingestor {
    parser: StructureParser,
    chunking: ChunkingConfig,
    chunker: Arc<dyn Chunker>,
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Ingestor {
    pub fn builder() -> IngestorBuilder {
        IngestorBuilder::default()
    }

    /// Ingests raw HTML (a full page or a fragment).
    ///
    /// Page metadata is read from the document head, content is extracted
    /// from the main region (`<main>`, `<article>`, or `<body>`), reduced to
    /// semantic tags, and chunked.
    pub async fn ingest(
        &self,
        html: &str,
        source: Option<Url>,
    ) -> Result<Ingestion, IngestError> {
        let started = Instant::now();

        let dom = Html::parse_document(html);
        let page_metadata = PageMetadata::from_document(&dom);
        let main = metadata::main_content(&dom);
        drop(dom);

        let content = self.parser.extract(&main)?;
        debug!(
            raw_bytes = html.len(),
            extracted_bytes = content.len(),
            "extracted structured content"
        );

        let mut document = Document::new(content, html.len()).with_metadata(page_metadata);
        if let Some(url) = source {
            document = document.with_source(url);
        }

        let outcome = if document.is_empty() {
            ChunkingOutcome::default()
        } else {
            self.chunker.chunk(&document.content, &self.chunking).await?
        };

        let telemetry = IngestTelemetry {
            chunker: self.chunker.name().to_string(),
            duration_ms: started.elapsed().as_millis() as u64,
            chunk_count: outcome.chunks.len(),
            average_tokens: outcome.stats.average_tokens,
        };
        info!(
            source = document.source_str(),
            chunks = telemetry.chunk_count,
            avg_tokens = telemetry.average_tokens,
            duration_ms = telemetry.duration_ms,
            "ingested document"
        );

        Ok(Ingestion {
            document,
            outcome,
            telemetry,
        })
    }

    /// Ingests a fetched page, wiring its URL through as the source.
    pub async fn ingest_fetched(&self, fetch: &FetchOutcome) -> Result<Ingestion, IngestError> {
        self.ingest(&fetch.content, Some(fetch.url.clone())).await
    }
}

/// Builder for [`Ingestor`]. All fields have working defaults.
#[derive(Default)]
pub struct IngestorBuilder {
    chunking: Option<ChunkingConfig>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl IngestorBuilder {
    #[must_use]
    pub fn with_chunking_config(mut self, config: ChunkingConfig) -> Self {
        self.chunking = Some(config);
        self
    }

    #[must_use]
    pub fn with_chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    pub fn build(self) -> Ingestor {
        Ingestor {
            parser: StructureParser::new(),
            chunking: self.chunking.unwrap_or_default(),
            chunker: self
                .chunker
                .unwrap_or_else(|| Arc::new(StructureChunker::new())),
        }
    }
}

/// Ingests HTML with the default pipeline configuration.
///
/// ```no_run
/// # async fn run() -> Result<(), html_ingestor::IngestError> {
/// let result = html_ingestor::ingest_html("<h1>Title</h1><p>Body text.</p>").await?;
/// assert!(!result.outcome.chunks.is_empty());
/// # Ok(())
/// # }
/// ```
pub async fn ingest_html(html: &str) -> Result<Ingestion, IngestError> {
    Ingestor::default().ingest(html, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ingest_extracts_metadata_and_chunks() {
        let html = r#"<html lang="en"><head><title>Doc</title></head><body>
            <h1>Intro</h1>
            <p>Opening paragraph with enough words to matter.</p>
            <h2>Details</h2>
            <p>More detail text follows here.</p>
        </body></html>"#;

        let result = ingest_html(html).await.unwrap();
        assert_eq!(result.document.metadata.title.as_deref(), Some("Doc"));
        assert_eq!(result.document.metadata.language.as_deref(), Some("en"));
        assert!(!result.outcome.chunks.is_empty());
        assert_eq!(result.telemetry.chunk_count, result.chunk_count());
        assert_eq!(result.telemetry.chunker, "structure");
    }

    #[tokio::test]
    async fn empty_html_produces_empty_outcome() {
        let result = ingest_html("").await.unwrap();
        assert!(result.document.is_empty());
        assert!(result.outcome.chunks.is_empty());
        assert_eq!(result.telemetry.chunk_count, 0);
    }

    #[tokio::test]
    async fn source_url_is_attached() {
        let url = Url::parse("https://example.com/page").unwrap();
        let ingestor = Ingestor::default();
        let result = ingestor
            .ingest("<p>Some text.</p>", Some(url.clone()))
            .await
            .unwrap();
        assert_eq!(result.document.source, Some(url));
    }

    #[tokio::test]
    async fn navigation_outside_main_is_ignored() {
        let html = "<html><body><nav><ul><li>Menu</li></ul></nav>\
                    <main><p>Actual content here.</p></main></body></html>";
        let result = ingest_html(html).await.unwrap();
        assert_eq!(result.outcome.chunks.len(), 1);
        assert!(result.outcome.chunks[0].content.contains("Actual content"));
        assert!(!result.outcome.chunks[0].content.contains("Menu"));
    }
}
