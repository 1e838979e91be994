//! Greedy assembly of segments into token-budgeted chunks.

use unicode_segmentation::UnicodeSegmentation;

use super::config::ChunkingConfig;
use super::segmenter::{Segment, SegmentKind};
use super::tokenizer;
use super::types::{Chunk, ChunkMetadata, ChunkingOutcome, ChunkingStats};

/// Packs segments into chunks.
///
/// Rules, in order:
/// * a heading closes the open chunk once it holds `min_tokens`;
/// * a segment that would push the open chunk past `max_tokens` starts a
///   new one, carrying a sentence tail of up to `overlap_tokens` forward;
/// * a single segment larger than `max_tokens` is split at sentence bounds
///   (never mid-sentence).
pub fn assemble(segments: &[Segment], config: &ChunkingConfig) -> ChunkingOutcome {
    let mut builder = ChunkBuilder::new(config);

    for segment in segments {
        let seg_tokens = tokenizer::estimate(&segment.text);

        if matches!(segment.kind, SegmentKind::Heading(_)) && builder.tokens >= config.min_tokens {
            builder.flush(false);
        }

        if config.split_oversized && seg_tokens > config.max_tokens {
            builder.flush(true);
            for piece in split_at_sentences(&segment.text, config.max_tokens) {
                let piece_tokens = tokenizer::estimate(&piece);
                builder.push(piece, segment, piece_tokens);
            }
            continue;
        }

        builder.push(segment.text.clone(), segment, seg_tokens);
    }

    builder.finish(segments.len())
}

struct ChunkBuilder<'c> {
    config: &'c ChunkingConfig,
    chunks: Vec<Chunk>,
    parts: Vec<String>,
    heading_path: Vec<String>,
    lead_kind: SegmentKind,
    segment_count: usize,
    tokens: usize,
    carry: Option<String>,
}

impl<'c> ChunkBuilder<'c> {
    fn new(config: &'c ChunkingConfig) -> Self {
        Self {
            config,
            chunks: Vec::new(),
            parts: Vec::new(),
            heading_path: Vec::new(),
            lead_kind: SegmentKind::default(),
            segment_count: 0,
            tokens: 0,
            carry: None,
        }
    }

    fn push(&mut self, text: String, segment: &Segment, seg_tokens: usize) {
        if !self.parts.is_empty() && self.tokens + seg_tokens > self.config.max_tokens {
            self.flush(true);
        }

        if self.parts.is_empty() {
            self.heading_path = segment.heading_path.clone();
            self.lead_kind = segment.kind;
            if let Some(prefix) = self.carry.take() {
                let prefix_tokens = tokenizer::estimate(&prefix);
                // The overlap rides inside the budget; drop it when the
                // incoming segment already fills the chunk.
                if prefix_tokens + seg_tokens <= self.config.max_tokens {
                    self.parts.push(prefix);
                    self.tokens = prefix_tokens;
                }
            }
        }

        self.parts.push(text);
        self.tokens += seg_tokens;
        self.segment_count += 1;
    }

    fn flush(&mut self, with_overlap: bool) {
        if self.parts.is_empty() {
            if !with_overlap {
                self.carry = None;
            }
            return;
        }

        let content = self.parts.join("\n");
        let token_count = tokenizer::estimate(&content);
        let metadata = ChunkMetadata {
            heading_hierarchy: std::mem::take(&mut self.heading_path),
            kind: std::mem::take(&mut self.lead_kind),
            segment_count: self.segment_count,
        };
        self.carry = if with_overlap && self.config.overlap_tokens > 0 {
            sentence_tail(&content, self.config.overlap_tokens)
        } else {
            None
        };
        self.chunks.push(Chunk::new(content, token_count, metadata));

        self.parts.clear();
        self.tokens = 0;
        self.segment_count = 0;
    }

    fn finish(mut self, total_segments: usize) -> ChunkingOutcome {
        self.flush(false);
        let total_chunks = self.chunks.len();
        let average_tokens = if total_chunks == 0 {
            0.0
        } else {
            self.chunks.iter().map(|c| c.token_count as f32).sum::<f32>() / total_chunks as f32
        };
        ChunkingOutcome {
            chunks: self.chunks,
            stats: ChunkingStats {
                total_segments,
                total_chunks,
                average_tokens,
            },
        }
    }
}

/// Splits text into pieces of at most `max_tokens` along sentence bounds.
/// A lone sentence above the budget is returned whole.
fn split_at_sentences(text: &str, max_tokens: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut tokens = 0usize;

    for sentence in text.split_sentence_bounds() {
        let sentence_tokens = tokenizer::estimate(sentence);
        if !piece.trim().is_empty() && tokens + sentence_tokens > max_tokens {
            pieces.push(piece.trim().to_string());
            piece = String::new();
            tokens = 0;
        }
        piece.push_str(sentence);
        tokens += sentence_tokens;
    }
    if !piece.trim().is_empty() {
        pieces.push(piece.trim().to_string());
    }
    pieces
}

/// Trailing sentences of `text` worth at most `budget` tokens, or `None`
/// when nothing fits. Never returns the whole text.
fn sentence_tail(text: &str, budget: usize) -> Option<String> {
    let sentences: Vec<&str> = text.split_sentence_bounds().collect();
    let mut tail_start = sentences.len();
    let mut tokens = 0usize;

    while tail_start > 1 {
        let candidate = tokenizer::estimate(sentences[tail_start - 1]);
        if tokens + candidate > budget {
            break;
        }
        tokens += candidate;
        tail_start -= 1;
    }

    if tail_start == sentences.len() {
        return None;
    }
    let tail = sentences[tail_start..].concat().trim().to_string();
    (!tail.is_empty()).then_some(tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, kind: SegmentKind, path: &[&str]) -> Segment {
        Segment {
            text: text.to_string(),
            kind,
            heading_path: path.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn para(text: &str, path: &[&str]) -> Segment {
        seg(text, SegmentKind::Paragraph, path)
    }

    fn sentence_of(words: usize) -> String {
        let mut s = vec!["word"; words].join(" ");
        s.push('.');
        s
    }

    #[test]
    fn empty_segments_yield_empty_outcome() {
        let outcome = assemble(&[], &ChunkingConfig::default());
        assert!(outcome.chunks.is_empty());
        assert_eq!(outcome.stats.total_chunks, 0);
        assert_eq!(outcome.stats.average_tokens, 0.0);
    }

    #[test]
    fn small_segments_pack_into_one_chunk() {
        let segments = vec![para("Alpha beta.", &[]), para("Gamma delta.", &[])];
        let outcome = assemble(&segments, &ChunkingConfig::default());
        assert_eq!(outcome.chunks.len(), 1);
        assert_eq!(outcome.chunks[0].content, "Alpha beta.\nGamma delta.");
        assert_eq!(outcome.chunks[0].metadata.segment_count, 2);
        assert_eq!(outcome.stats.total_segments, 2);
    }

    #[test]
    fn max_tokens_forces_a_new_chunk() {
        let config = ChunkingConfig::default()
            .with_max_tokens(30)
            .with_overlap_tokens(0);
        let segments = vec![
            para(&sentence_of(15), &[]),
            para(&sentence_of(15), &[]),
            para(&sentence_of(15), &[]),
        ];
        let outcome = assemble(&segments, &config);
        assert_eq!(outcome.chunks.len(), 3);
        for chunk in &outcome.chunks {
            assert!(chunk.token_count <= 30);
        }
    }

    #[test]
    fn heading_flushes_once_min_tokens_reached() {
        let config = ChunkingConfig::default().with_min_tokens(4).with_overlap_tokens(0);
        let segments = vec![
            seg("Intro", SegmentKind::Heading(1), &["Intro"]),
            para("Some opening words here.", &["Intro"]),
            seg("Details", SegmentKind::Heading(2), &["Intro", "Details"]),
            para("Detail text.", &["Intro", "Details"]),
        ];
        let outcome = assemble(&segments, &config);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[0].metadata.heading_hierarchy, vec!["Intro"]);
        assert_eq!(outcome.chunks[0].metadata.kind, SegmentKind::Heading(1));
        assert_eq!(
            outcome.chunks[1].metadata.heading_hierarchy,
            vec!["Intro", "Details"]
        );
        assert_eq!(outcome.chunks[1].metadata.kind, SegmentKind::Heading(2));
        assert!(outcome.chunks[1].content.starts_with("Details"));
    }

    #[test]
    fn chunk_kind_follows_the_lead_segment() {
        let config = ChunkingConfig::default()
            .with_max_tokens(20)
            .with_overlap_tokens(0);
        let segments = vec![
            seg("- an item with a few words", SegmentKind::ListItem, &[]),
            para(&sentence_of(12), &[]),
        ];
        let outcome = assemble(&segments, &config);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[0].metadata.kind, SegmentKind::ListItem);
        assert_eq!(outcome.chunks[1].metadata.kind, SegmentKind::Paragraph);
    }

    #[test]
    fn tiny_section_keeps_heading_with_previous_chunk() {
        // min_tokens not reached yet: the heading joins the open chunk.
        let config = ChunkingConfig::default().with_min_tokens(100);
        let segments = vec![
            seg("A", SegmentKind::Heading(1), &["A"]),
            para("Short.", &["A"]),
            seg("B", SegmentKind::Heading(1), &["B"]),
            para("Also short.", &["B"]),
        ];
        let outcome = assemble(&segments, &config);
        assert_eq!(outcome.chunks.len(), 1);
    }

    #[test]
    fn oversized_segment_splits_at_sentence_bounds() {
        let config = ChunkingConfig::default()
            .with_max_tokens(30)
            .with_overlap_tokens(0);
        let long = format!(
            "{} {} {}",
            sentence_of(15),
            sentence_of(15),
            sentence_of(15)
        );
        let outcome = assemble(&[para(&long, &[])], &config);
        assert!(outcome.chunks.len() >= 2);
        for chunk in &outcome.chunks {
            assert!(chunk.token_count <= 30, "chunk at {} tokens", chunk.token_count);
        }
    }

    #[test]
    fn lone_giant_sentence_is_emitted_whole() {
        let config = ChunkingConfig::default().with_max_tokens(10);
        let giant = sentence_of(50);
        let outcome = assemble(&[para(&giant, &[])], &config);
        assert_eq!(outcome.chunks.len(), 1);
        assert_eq!(outcome.chunks[0].content, giant);
    }

    #[test]
    fn overlap_carries_sentence_tail_forward() {
        let config = ChunkingConfig::default()
            .with_max_tokens(30)
            .with_overlap_tokens(10);
        let first = sentence_of(10);
        let second = "Tail sentence here.".to_string();
        let third = sentence_of(10);
        let segments = vec![
            para(&format!("{first} {second}"), &[]),
            para(&third, &[]),
        ];
        let outcome = assemble(&segments, &config);
        assert_eq!(outcome.chunks.len(), 2);
        assert!(
            outcome.chunks[1].content.starts_with("Tail sentence here."),
            "second chunk should open with the carried tail: {:?}",
            outcome.chunks[1].content
        );
    }

    #[test]
    fn chunk_order_follows_document_order() {
        let config = ChunkingConfig::default()
            .with_max_tokens(20)
            .with_overlap_tokens(0);
        let segments: Vec<Segment> = (0..5)
            .map(|i| para(&format!("Paragraph number {i} with several words inside."), &[]))
            .collect();
        let outcome = assemble(&segments, &config);
        let mut last_seen = None;
        for chunk in &outcome.chunks {
            let idx: usize = chunk
                .content
                .split_whitespace()
                .nth(2)
                .and_then(|n| n.parse().ok())
                .unwrap();
            if let Some(prev) = last_seen {
                assert!(idx > prev);
            }
            last_seen = Some(idx);
        }
    }
}
