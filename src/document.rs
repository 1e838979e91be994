//! The ingested document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::parser::PageMetadata;

/// A fully ingested HTML document: cleaned, structure-preserving content plus
/// page metadata and provenance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier assigned at ingestion time.
    pub id: Uuid,
    /// Where the document came from, when fetched from the network.
    pub source: Option<Url>,
    /// Page metadata (title, description, language).
    pub metadata: PageMetadata,
    /// Cleaned content with semantic tags preserved.
    pub content: String,
    /// Size of the raw input in bytes, for telemetry.
    pub raw_bytes: usize,
    pub ingested_at: DateTime<Utc>,
}

impl Document {
    /// Builds a document from cleaned content.
    pub fn new(content: impl Into<String>, raw_bytes: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: None,
            metadata: PageMetadata::default(),
            content: content.into(),
            raw_bytes,
            ingested_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Url) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: PageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns `true` when extraction produced no usable text.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Source URL as a string, or an empty string for in-memory input.
    pub fn source_str(&self) -> &str {
        self.source.as_ref().map(Url::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_get_unique_ids() {
        let a = Document::new("one", 3);
        let b = Document::new("two", 3);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_detection_ignores_whitespace() {
        assert!(Document::new("  \n ", 4).is_empty());
        assert!(!Document::new("text", 4).is_empty());
    }

    #[test]
    fn serializes_round_trip() {
        let doc = Document::new("<p>hi</p>", 9)
            .with_source(Url::parse("https://example.com/a").unwrap());
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, doc.id);
        assert_eq!(back.source, doc.source);
        assert_eq!(back.content, doc.content);
    }
}
