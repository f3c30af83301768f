//! transcript-vocab — turns spoken-language transcripts into structured
//! vocabulary lists by orchestrating calls to an OpenAI-compatible
//! generation backend.
//!
//! # Pipeline flow
//!
//! ```text
//! [Segment…] ─▶ TranscriptChunker ─▶ [Chunk…]
//!                                        │
//!                    ┌───────────────────┴───────────────────┐
//!                    ▼ (concurrent)                          ▼ (concurrent)
//!            term extraction                        phrase extraction
//!         (one call per chunk,                   (one call per chunk,
//!          failed chunks skipped)                 failed chunks skipped)
//!                    │ merge + case-fold                     │ merge + case-fold
//!                    ▼                                       ▼
//!            term enrichment                        phrase enrichment
//!         (whole set, prompt-variant             (whole set, prompt-variant
//!          fallback, degrade on exhaust)          fallback, degrade on exhaust)
//!                    └───────────────────┬───────────────────┘
//!                                        ▼
//!                              assemble ─▶ VocabularyList
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use transcript_vocab::config::AppConfig;
//! use transcript_vocab::pipeline::VocabularyPipeline;
//! use transcript_vocab::transcript::{CharTokenCounter, Segment, TranscriptChunker};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!
//!     let segments = vec![Segment::new("let's break the ice", 0.0, 1.8)];
//!     let chunker = TranscriptChunker::new(
//!         config.chunk.max_tokens,
//!         CharTokenCounter::new(config.chunk.chars_per_token),
//!     );
//!     let chunks = chunker.chunk(&segments);
//!
//!     let pipeline = VocabularyPipeline::new(config);
//!     let list = pipeline.generate(&chunks, "vid123").await.unwrap();
//!     println!("{} words, {} phrases", list.words.len(), list.phrases.len());
//! }
//! ```

pub mod config;
pub mod llm;
pub mod pipeline;
pub mod transcript;
pub mod vocab;
