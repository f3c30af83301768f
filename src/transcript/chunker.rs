//! Token-bounded transcript chunking.
//!
//! [`TranscriptChunker`] greedily packs consecutive [`Segment`]s into
//! [`Chunk`]s whose token counts stay under a configured bound, so each
//! chunk fits comfortably inside one generation request. Token counting is
//! behind the [`TokenCounter`] trait; the default [`CharTokenCounter`]
//! approximates one token per four characters, which is close enough for
//! budgeting prompts without shipping a real tokenizer.

use serde::{Deserialize, Serialize};

use super::segment::Segment;

// ---------------------------------------------------------------------------
// TokenCounter
// ---------------------------------------------------------------------------

/// Counts generation tokens in a piece of text.
pub trait TokenCounter {
    /// Approximate token count of `text`.
    fn count(&self, text: &str) -> usize;
}

/// Character-ratio token estimate (1 token ≈ `chars_per_token` characters).
#[derive(Debug, Clone)]
pub struct CharTokenCounter {
    chars_per_token: usize,
}

impl CharTokenCounter {
    /// Create a counter with an explicit characters-per-token ratio.
    /// A ratio of 0 is clamped to 1.
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for CharTokenCounter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenCounter for CharTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

// ---------------------------------------------------------------------------
// Chunk
// ---------------------------------------------------------------------------

/// A token-bounded contiguous span of transcript segments.
///
/// Created once by the chunker and consumed once by extraction — never
/// mutated in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Segment texts joined with single spaces.
    pub text: String,
    /// Sum of the member segments' token counts.
    pub token_count: usize,
    /// Inclusive `(start, end)` indices of the segments consumed.
    pub segment_range: (usize, usize),
}

// ---------------------------------------------------------------------------
// TranscriptChunker
// ---------------------------------------------------------------------------

/// Greedy segment-to-chunk packer.
///
/// # Example
/// ```rust
/// use transcript_vocab::transcript::{CharTokenCounter, Segment, TranscriptChunker};
///
/// let segments = vec![
///     Segment::new("break the ice", 0.0, 1.5),
///     Segment::new("once in a blue moon", 1.5, 2.0),
/// ];
/// let chunker = TranscriptChunker::new(100, CharTokenCounter::default());
/// let chunks = chunker.chunk(&segments);
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].segment_range, (0, 1));
/// ```
pub struct TranscriptChunker<C: TokenCounter> {
    max_tokens: usize,
    counter: C,
}

impl<C: TokenCounter> TranscriptChunker<C> {
    /// Create a chunker with the given token bound and counter.
    pub fn new(max_tokens: usize, counter: C) -> Self {
        Self {
            max_tokens,
            counter,
        }
    }

    /// Pack `segments` into ordered, non-overlapping chunks.
    ///
    /// A segment is appended to the running chunk unless doing so would push
    /// the running count past the bound, in which case the running chunk is
    /// closed first. A single segment that alone exceeds the bound still
    /// becomes its own chunk — the bound is exceeded, documented, and never
    /// an error; splitting inside a segment is not this component's job.
    ///
    /// Empty input yields empty output.
    pub fn chunk(&self, segments: &[Segment]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        let mut pending_start = 0;
        let mut pending_tokens = 0;

        for (idx, segment) in segments.iter().enumerate() {
            let cost = self.counter.count(&segment.text);

            if pending_tokens + cost > self.max_tokens && !pending.is_empty() {
                chunks.push(Chunk {
                    text: pending.join(" "),
                    token_count: pending_tokens,
                    segment_range: (pending_start, idx - 1),
                });
                pending.clear();
                pending_start = idx;
                pending_tokens = 0;
            }

            pending.push(&segment.text);
            pending_tokens += cost;
        }

        if !pending.is_empty() {
            chunks.push(Chunk {
                text: pending.join(" "),
                token_count: pending_tokens,
                segment_range: (pending_start, segments.len() - 1),
            });
        }

        log::debug!(
            "chunker: packed {} segments into {} chunks (max_tokens = {})",
            segments.len(),
            chunks.len(),
            self.max_tokens
        );

        chunks
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts whitespace-separated words — exact and predictable for tests.
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn segments(texts: &[&str]) -> Vec<Segment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Segment::new(*t, i as f64, 1.0))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let chunker = TranscriptChunker::new(10, WordCounter);
        assert!(chunker.chunk(&[]).is_empty());
    }

    #[test]
    fn single_chunk_when_everything_fits() {
        let chunker = TranscriptChunker::new(10, WordCounter);
        let segs = segments(&["one two", "three four five"]);

        let chunks = chunker.chunk(&segs);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "one two three four five");
        assert_eq!(chunks[0].token_count, 5);
        assert_eq!(chunks[0].segment_range, (0, 1));
    }

    #[test]
    fn closes_chunk_before_exceeding_bound() {
        let chunker = TranscriptChunker::new(4, WordCounter);
        // 3 + 2 would exceed 4, so the second segment starts a new chunk.
        let segs = segments(&["a b c", "d e", "f"]);

        let chunks = chunker.chunk(&segs);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "a b c");
        assert_eq!(chunks[0].segment_range, (0, 0));
        assert_eq!(chunks[1].text, "d e f");
        assert_eq!(chunks[1].token_count, 3);
        assert_eq!(chunks[1].segment_range, (1, 2));
    }

    #[test]
    fn no_chunk_exceeds_bound_unless_single_oversized_segment() {
        let chunker = TranscriptChunker::new(5, WordCounter);
        let segs = segments(&[
            "a b c",
            "d e f g h i j", // 7 words — alone exceeds the bound
            "k l",
            "m n o p",
        ]);

        let chunks = chunker.chunk(&segs);
        for chunk in &chunks {
            let single = chunk.segment_range.0 == chunk.segment_range.1;
            assert!(
                chunk.token_count <= 5 || single,
                "multi-segment chunk over bound: {chunk:?}"
            );
        }
        // The oversized segment sits alone.
        let oversized = chunks.iter().find(|c| c.token_count > 5).unwrap();
        assert_eq!(oversized.segment_range, (1, 1));
        assert_eq!(oversized.token_count, 7);
    }

    #[test]
    fn ranges_cover_all_segments_without_gaps_or_overlaps() {
        let chunker = TranscriptChunker::new(3, WordCounter);
        let segs = segments(&["a", "b c", "d e f", "g", "h i", "j k l m", "n"]);

        let chunks = chunker.chunk(&segs);
        let mut expected_start = 0;
        for chunk in &chunks {
            let (start, end) = chunk.segment_range;
            assert_eq!(start, expected_start, "gap or overlap at segment {start}");
            assert!(end >= start);
            expected_start = end + 1;
        }
        assert_eq!(expected_start, segs.len(), "tail segments not covered");
    }

    #[test]
    fn char_counter_rounds_up() {
        let counter = CharTokenCounter::new(4);
        assert_eq!(counter.count(""), 0);
        assert_eq!(counter.count("abcd"), 1);
        assert_eq!(counter.count("abcde"), 2);
    }

    #[test]
    fn char_counter_clamps_zero_ratio() {
        let counter = CharTokenCounter::new(0);
        assert_eq!(counter.count("ab"), 2);
    }
}
