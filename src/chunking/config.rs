//! Chunking configuration.

use serde::{Deserialize, Serialize};

/// Budgets controlling chunk assembly.
///
/// Token counts are estimates (see [`crate::chunking::tokenizer`]); budgets
/// are soft in the single case of a sentence that alone exceeds
/// `max_tokens`, which is emitted whole rather than split mid-word.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Upper bound on tokens per chunk.
    pub max_tokens: usize,
    /// A heading only closes the open chunk once it holds this many tokens.
    pub min_tokens: usize,
    /// Sentence-tail overlap carried between consecutive chunks. Zero
    /// disables overlap.
    pub overlap_tokens: usize,
    /// Split single segments that exceed `max_tokens` at sentence bounds.
    pub split_oversized: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 400,
            min_tokens: 48,
            overlap_tokens: 40,
            split_oversized: true,
        }
    }
}

impl ChunkingConfig {
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_min_tokens(mut self, min_tokens: usize) -> Self {
        self.min_tokens = min_tokens;
        self
    }

    #[must_use]
    pub fn with_overlap_tokens(mut self, overlap_tokens: usize) -> Self {
        self.overlap_tokens = overlap_tokens;
        self
    }

    #[must_use]
    pub fn with_split_oversized(mut self, split_oversized: bool) -> Self {
        self.split_oversized = split_oversized;
        self
    }
}
