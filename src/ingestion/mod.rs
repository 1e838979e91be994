//! Fetching, caching, and persistence plumbing around the core pipeline.
//!
//! * [`cache`] — disk-backed cache for downloaded pages.
//! * [`ledger`] — per-URL record of ingestion outcomes for resumable jobs.
//! * [`records`] — flattened chunk rows for downstream stores.
//! * [`sink`] — async persistence seam plus a JSONL implementation.

pub mod cache;
pub mod ledger;
pub mod records;
pub mod sink;

pub use cache::{DocumentCache, FetchOutcome, Fetcher};
pub use ledger::{IngestLedger, LedgerEntry};
pub use records::{ChunkRecord, ingestion_to_records};
pub use sink::{ChunkSink, JsonlSink};
