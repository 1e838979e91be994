//! Disk-backed caching for downloaded pages.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;
use tracing::debug;
use url::Url;

use crate::types::IngestError;

/// Filesystem cache keyed by URL.
///
/// URLs map to deterministic file names (sanitized path segments plus query),
/// so repeated runs reuse previously downloaded pages instead of hitting the
/// network.
#[derive(Clone, Debug)]
pub struct DocumentCache {
    root: PathBuf,
}

impl DocumentCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file path for a URL. Stable across runs.
    pub fn entry_path(&self, url: &Url) -> PathBuf {
        let mut name = url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty())
            .map(sanitize)
            .collect::<Vec<_>>()
            .join("_");

        if name.is_empty() {
            name.push_str("index");
        }
        if let Some(query) = url.query() {
            name.push('_');
            name.push_str(&sanitize(query));
        }
        if Path::new(&name).extension().is_none() {
            name.push_str(".html");
        }

        self.root.join(name)
    }

    /// Default location for the ingest ledger within this cache.
    pub fn ledger_file(&self) -> PathBuf {
        self.root.join("ingest_ledger.json")
    }

    async fn read(&self, url: &Url) -> Result<Option<String>, IngestError> {
        let path = self.entry_path(url);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path).await?))
    }

    async fn write(&self, url: &Url, content: &str) -> Result<PathBuf, IngestError> {
        let path = self.entry_path(url);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        Ok(path)
    }
}

fn sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Result of fetching a page, with cache provenance.
#[derive(Clone, Debug)]
pub struct FetchOutcome {
    pub url: Url,
    pub content: String,
    pub bytes: usize,
    pub cache_path: Option<PathBuf>,
    pub from_cache: bool,
}

/// Cache-first page fetcher.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    cache: Option<DocumentCache>,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: DocumentCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetches `url`, serving from the cache when an entry exists and
    /// writing newly downloaded pages back to it.
    pub async fn fetch(&self, url: &Url) -> Result<FetchOutcome, IngestError> {
        if let Some(cache) = &self.cache {
            if let Some(content) = cache.read(url).await? {
                debug!(%url, bytes = content.len(), "serving page from cache");
                return Ok(FetchOutcome {
                    url: url.clone(),
                    bytes: content.len(),
                    cache_path: Some(cache.entry_path(url)),
                    from_cache: true,
                    content,
                });
            }
        }

        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let content = response.text().await?;
        debug!(%url, bytes = content.len(), "downloaded page");

        let cache_path = match &self.cache {
            Some(cache) => Some(cache.write(url, &content).await?),
            None => None,
        };

        Ok(FetchOutcome {
            url: url.clone(),
            bytes: content.len(),
            cache_path,
            from_cache: false,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn entry_path_sanitizes_segments_and_query() {
        let cache = DocumentCache::new("tmp");
        let url = Url::parse("https://example.com/foo/bar?chapter=1&lang=en").unwrap();
        let path = cache.entry_path(&url);
        assert!(path.ends_with("foo_bar_chapter_1_lang_en.html"));
    }

    #[test]
    fn entry_path_defaults_to_index() {
        let cache = DocumentCache::new("tmp");
        let url = Url::parse("https://example.com/").unwrap();
        assert!(cache.entry_path(&url).ends_with("index.html"));
    }

    #[test]
    fn entry_path_keeps_existing_extension() {
        let cache = DocumentCache::new("tmp");
        let url = Url::parse("https://example.com/page.xhtml").unwrap();
        assert!(cache.entry_path(&url).ends_with("page.xhtml"));
    }

    #[tokio::test]
    async fn fetch_prefers_cache_entry() {
        let dir = tempdir().unwrap();
        let cache = DocumentCache::new(dir.path());
        let url = Url::parse("https://example.com/cached").unwrap();
        cache.write(&url, "cached html").await.unwrap();

        let fetcher = Fetcher::new(Client::new()).with_cache(cache);
        let outcome = fetcher.fetch(&url).await.unwrap();
        assert!(outcome.from_cache);
        assert_eq!(outcome.content, "cached html");
        assert_eq!(outcome.bytes, "cached html".len());
    }
}
