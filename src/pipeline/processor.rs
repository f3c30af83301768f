//! Pipeline orchestrator — drives chunks through extraction, enrichment and
//! assembly.
//!
//! # Pipeline flow
//!
//! ```text
//! generate(chunks, subject_id)
//!   ├─ Stage 1: tokio::join!
//!   │    ├─ extract_terms    (per-chunk fan-out, chunk-skip on failure)
//!   │    └─ extract_phrases  (per-chunk fan-out, chunk-skip on failure)
//!   │          └─ both empty → Err(NothingExtracted)
//!   ├─ Stage 2: tokio::join!
//!   │    ├─ enrich_terms     (variant fallback; exhausted → empty map)
//!   │    └─ enrich_phrases   (variant fallback; exhausted → empty map)
//!   └─ Stage 3: assemble → VocabularyList
//! ```
//!
//! Every coordinator invocation gets its own freshly constructed client,
//! dropped when the stage block ends — no client outlives the stage it
//! serves, and no global instance exists anywhere.

use thiserror::Error;

use crate::config::AppConfig;
use crate::llm::client::{ChatClient, GatewayClient, GenerationParams};
use crate::llm::enrich::{self, EnrichmentOutcome};
use crate::llm::extract;
use crate::transcript::Chunk;
use crate::vocab::VocabularyList;

use super::assemble::assemble;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Fatal pipeline failures — the only two ways a run can end without a
/// vocabulary list. Everything else degrades partially instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller supplied no chunks or a blank subject id.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Term and phrase extraction both came back completely empty, so
    /// there is nothing to return.
    #[error("term and phrase extraction both came back empty for subject '{0}'")]
    NothingExtracted(String),
}

// ---------------------------------------------------------------------------
// VocabularyPipeline
// ---------------------------------------------------------------------------

/// Runs the whole chunks-to-vocabulary pipeline for one transcript.
///
/// Holds only configuration — backend clients are constructed per stage
/// inside [`generate`](Self::generate) and dropped with it.
pub struct VocabularyPipeline {
    config: AppConfig,
}

impl VocabularyPipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Generate a vocabulary list from pre-chunked transcript text.
    ///
    /// # Errors
    ///
    /// * [`PipelineError::EmptyInput`] — `chunks` is empty or `subject_id`
    ///   is blank.
    /// * [`PipelineError::NothingExtracted`] — every chunk of both
    ///   extraction tracks failed or produced nothing.
    pub async fn generate(
        &self,
        chunks: &[Chunk],
        subject_id: &str,
    ) -> Result<VocabularyList, PipelineError> {
        self.generate_with(|| GatewayClient::from_config(&self.config.llm), chunks, subject_id)
            .await
    }

    /// Like [`generate`](Self::generate), with an explicit client factory.
    ///
    /// `make_client` is called once per coordinator invocation (two
    /// extraction tracks, two enrichment tracks); each client lives only
    /// for its stage. This is the seam tests and custom backends plug
    /// into.
    pub async fn generate_with<C, F>(
        &self,
        make_client: F,
        chunks: &[Chunk],
        subject_id: &str,
    ) -> Result<VocabularyList, PipelineError>
    where
        C: ChatClient,
        F: Fn() -> C,
    {
        if chunks.is_empty() {
            return Err(PipelineError::EmptyInput("no chunks to process".into()));
        }
        let subject_id = subject_id.trim();
        if subject_id.is_empty() {
            return Err(PipelineError::EmptyInput("blank subject id".into()));
        }

        let params = GenerationParams::from(&self.config.llm);
        log::info!(
            "pipeline: start for '{subject_id}' ({} chunks)",
            chunks.len()
        );

        // ── Stage 1: extraction (terms ∥ phrases) ────────────────────────
        let (terms, phrases) = tokio::join!(
            async {
                let client = make_client();
                extract::extract_terms(&client, chunks, subject_id, &params).await
            },
            async {
                let client = make_client();
                extract::extract_phrases(&client, chunks, subject_id, &params).await
            },
        );

        if terms.result.is_empty() && phrases.result.is_empty() {
            log::error!("pipeline: nothing extracted for '{subject_id}'");
            return Err(PipelineError::NothingExtracted(subject_id.to_string()));
        }
        log::info!(
            "pipeline: stage 1 complete for '{subject_id}' — {} terms, {} phrases",
            terms.result.len(),
            phrases.result.len()
        );

        // ── Stage 2: enrichment (terms ∥ phrases) ────────────────────────
        let (term_enrichment, phrase_enrichment) = tokio::join!(
            async {
                let client = make_client();
                enrich::enrich_terms(&client, &terms, &params).await
            },
            async {
                let client = make_client();
                enrich::enrich_phrases(&client, &phrases, &params).await
            },
        );

        // A track that exhausted every prompt variant degrades to an empty
        // enrichment map — entries still come out, just undecorated.
        let term_enrichment = term_enrichment.unwrap_or_else(|e| {
            log::warn!("pipeline: term enrichment degraded to empty for '{subject_id}': {e}");
            EnrichmentOutcome::empty(subject_id)
        });
        let phrase_enrichment = phrase_enrichment.unwrap_or_else(|e| {
            log::warn!("pipeline: phrase enrichment degraded to empty for '{subject_id}': {e}");
            EnrichmentOutcome::empty(subject_id)
        });

        // ── Stage 3: assembly ────────────────────────────────────────────
        let list = assemble(&terms, &phrases, &term_enrichment, &phrase_enrichment);
        log::info!(
            "pipeline: done for '{subject_id}' — {} words, {} phrases",
            list.words.len(),
            list.phrases.len()
        );
        Ok(list)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
