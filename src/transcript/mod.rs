//! Transcript intake: segment type and token-bounded chunking.
//!
//! ```text
//! [Segment, Segment, …]  ──▶  TranscriptChunker  ──▶  [Chunk, Chunk, …]
//!        (ordered)              (greedy packing)        (token-bounded)
//! ```
//!
//! Downstream stages consume chunks only — segments never cross the LLM
//! boundary directly.

pub mod chunker;
pub mod segment;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chunker::{CharTokenCounter, Chunk, TokenCounter, TranscriptChunker};
pub use segment::Segment;
