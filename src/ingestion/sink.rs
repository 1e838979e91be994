//! Persistence seam for chunk records.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::records::ChunkRecord;
use crate::types::IngestError;

/// Destination for chunk records. Implementations decide durability and
/// format; batches must be written atomically enough that a partial batch is
/// detectable (the JSONL sink appends whole lines only).
#[async_trait]
pub trait ChunkSink: Send + Sync {
    async fn write_batch(&self, records: &[ChunkRecord]) -> Result<(), IngestError>;
}

/// Appends records to a file, one JSON object per line.
#[derive(Clone, Debug)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ChunkSink for JsonlSink {
    async fn write_batch(&self, records: &[ChunkRecord]) -> Result<(), IngestError> {
        if records.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut buffer = String::new();
        for record in records {
            buffer.push_str(
                &serde_json::to_string(record)
                    .map_err(|err| IngestError::Storage(err.to_string()))?,
            );
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.flush().await?;
        debug!(path = %self.path.display(), count = records.len(), "wrote chunk records");
        Ok(())
    }
}
