//! LLM orchestration module for transcript-vocab.
//!
//! This module provides:
//! * [`ChatClient`] — async trait implemented by all generation backends.
//! * [`GatewayClient`] — OpenAI-compatible REST client with linear-backoff
//!   retries and response unwrapping.
//! * [`extract`] — concurrent per-chunk extraction with chunk-skip failure
//!   tolerance, folding through the normalizing [`merge`].
//! * [`enrich`] — whole-set enrichment with ordered prompt-variant
//!   fallback.
//! * [`prompt`] — prompt builders for both stages.
//! * [`LlmError`] — error variants for backend operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use transcript_vocab::config::LlmConfig;
//! use transcript_vocab::llm::{extract, GatewayClient, GenerationParams};
//! use transcript_vocab::transcript::Chunk;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LlmConfig::default();
//!     let params = GenerationParams::from(&config);
//!     let chunks = vec![Chunk {
//!         text: "break the ice".into(),
//!         token_count: 4,
//!         segment_range: (0, 0),
//!     }];
//!
//!     // One client per coordinator invocation, dropped afterward.
//!     let client = GatewayClient::from_config(&config);
//!     let terms = extract::extract_terms(&client, &chunks, "vid123", &params).await;
//!     println!("{} terms", terms.result.len());
//! }
//! ```

pub mod client;
pub mod enrich;
pub mod extract;
pub mod merge;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ChatClient, ChatMessage, GatewayClient, GenerationParams, LlmError};
pub use enrich::{enrich_phrases, enrich_terms, EnrichmentOutcome};
pub use extract::{extract_phrases, extract_terms, ExtractionOutcome};
pub use prompt::PromptVariant;
