//! HTML parsing that preserves semantic structure.
//!
//! * [`structure`] — reduces arbitrary HTML to a small set of semantic tags
//!   with normalized whitespace, ready for chunking.
//! * [`metadata`] — pulls page-level metadata (title, description, language)
//!   from full documents.

pub mod metadata;
pub mod structure;

pub use metadata::PageMetadata;
pub use structure::{BLOCK_TAGS, KEEP_TAGS, StructureParser};
