//! Per-URL ledger of what ingestion produced, so interrupted jobs can skip
//! pages they already finished.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::types::IngestError;

/// What the ledger remembers about one ingested page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub ingested_at: DateTime<Utc>,
    /// Chunks the page produced.
    pub chunks: usize,
}

/// Persistent map from URL to its ingestion outcome.
///
/// The ledger file is a JSON object keyed by URL, rewritten on every recorded
/// page. Serialization and the write happen under the entry lock, so
/// concurrent records on clones cannot persist a stale snapshot over a newer
/// one; a crashed job loses at most the page it was working on.
#[derive(Clone, Debug)]
pub struct IngestLedger {
    path: PathBuf,
    entries: Arc<Mutex<HashMap<String, LedgerEntry>>>,
}

impl IngestLedger {
    /// Opens the ledger at `path`, loading any persisted entries. A missing
    /// file starts an empty ledger.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, IngestError> {
        let path = path.into();
        let entries: HashMap<String, LedgerEntry> = if path.exists() {
            let data = fs::read_to_string(&path).await?;
            serde_json::from_str(&data).map_err(|err| IngestError::Storage(err.to_string()))?
        } else {
            HashMap::new()
        };
        debug!(path = %path.display(), pages = entries.len(), "opened ingest ledger");
        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn contains(&self, url: &Url) -> bool {
        self.entries.lock().await.contains_key(url.as_str())
    }

    /// The recorded outcome for `url`, if it was ingested before.
    pub async fn entry(&self, url: &Url) -> Option<LedgerEntry> {
        self.entries.lock().await.get(url.as_str()).cloned()
    }

    /// Records that `url` was ingested into `chunks` chunks and persists the
    /// ledger. Recording a URL again refreshes its entry.
    pub async fn record(&self, url: &Url, chunks: usize) -> Result<(), IngestError> {
        let mut guard = self.entries.lock().await;
        guard.insert(
            url.as_str().to_string(),
            LedgerEntry {
                ingested_at: Utc::now(),
                chunks,
            },
        );
        let serialized = serde_json::to_string_pretty(&*guard)
            .map_err(|err| IngestError::Storage(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.path, serialized).await?;
        Ok(())
    }
}
