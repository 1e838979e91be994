//! Deterministic token estimation.
//!
//! Boundary decisions only need a stable approximation, not an exact BPE
//! count. The estimate scales Unicode word count by 4/3 (roughly 0.75 words
//! per token for English-like text).

use unicode_segmentation::UnicodeSegmentation;

/// Estimates the token count of `text`. Non-empty text estimates to at
/// least 1; whitespace-only text to 0.
pub fn estimate(text: &str) -> usize {
    let words = text.unicode_words().count();
    if words == 0 {
        usize::from(!text.trim().is_empty())
    } else {
        (words * 4).div_ceil(3)
    }
}
