//! Stage-2 enrichment coordinator — whole-set request with prompt-variant
//! fallback.
//!
//! Unlike extraction, enrichment targets the *entire* merged map in one
//! call, so there is no independently skippable unit: a malformed response
//! is retried with the next prompt variant (a deterministic alternative
//! phrasing, never a blind repeat), and running out of variants is a real
//! failure for the caller to handle.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::llm::client::{ChatClient, ChatMessage, GenerationParams, LlmError};
use crate::llm::extract::{parse_result_object, ExtractionOutcome};
use crate::llm::prompt;
use crate::vocab::record::normalize_key;
use crate::vocab::{PhraseEnrichment, PhraseMap, TermEnrichment, TermMap};

// ---------------------------------------------------------------------------
// EnrichmentOutcome
// ---------------------------------------------------------------------------

/// A stage-2 result for one track, keyed by normalized term/phrase.
///
/// Lookup-only — assembly order comes from the extraction map, so a plain
/// hash map is the right container here.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome<E> {
    /// Identifier of the transcript being processed.
    pub subject_id: String,
    /// Enrichment records by normalized key.
    pub result: HashMap<String, E>,
}

impl<E> EnrichmentOutcome<E> {
    /// An outcome with no enrichment data — used for the empty-input short
    /// circuit and for track-level degradation in the pipeline.
    pub fn empty(subject_id: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            result: HashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Variant fallback core
// ---------------------------------------------------------------------------

/// Try each prebuilt `(version, prompt)` in order; first well-formed
/// `result` object wins and ends the sequence. Exhausting the list
/// surfaces the last recorded error.
async fn request_with_fallback<C>(
    client: &C,
    prompts: &[(&'static str, String)],
    subject_id: &str,
    process: &str,
    params: &GenerationParams,
) -> Result<Map<String, Value>, LlmError>
where
    C: ChatClient + ?Sized,
{
    let total = prompts.len();
    let mut last_error = None;

    for (attempt, (version, prompt_text)) in prompts.iter().enumerate() {
        log::info!(
            "{process}: attempt {}/{total} (variant {version}) for '{subject_id}'",
            attempt + 1
        );

        let messages = [ChatMessage::user(prompt_text.clone())];
        let outcome = client
            .complete(&messages, params.temperature, params.max_tokens)
            .await
            .and_then(|content| parse_result_object(&content));

        match outcome {
            Ok(map) => {
                log::info!(
                    "{process}: variant {version} succeeded for '{subject_id}' ({} items)",
                    map.len()
                );
                return Ok(map);
            }
            Err(e) => {
                log::error!("{process}: variant {version} failed for '{subject_id}': {e}");
                last_error = Some(e);
            }
        }
    }

    log::error!("{process}: all {total} prompt variants exhausted for '{subject_id}'");
    Err(last_error.unwrap_or(LlmError::EmptyResponse))
}

// ---------------------------------------------------------------------------
// Track entry points
// ---------------------------------------------------------------------------

/// Request synonyms and an example sentence for every extracted term.
///
/// An empty extraction map short-circuits to an empty outcome without any
/// backend call.
pub async fn enrich_terms<C>(
    client: &C,
    extraction: &ExtractionOutcome<TermMap>,
    params: &GenerationParams,
) -> Result<EnrichmentOutcome<TermEnrichment>, LlmError>
where
    C: ChatClient + ?Sized,
{
    let subject_id = extraction.subject_id.as_str();
    if extraction.result.is_empty() {
        log::warn!("term enrichment: nothing to enrich for '{subject_id}'");
        return Ok(EnrichmentOutcome::empty(subject_id));
    }

    let prompts: Vec<(&'static str, String)> = prompt::word_enrichment_variants()
        .iter()
        .map(|variant| (variant.version, (variant.build)(&extraction.result, subject_id)))
        .collect();

    let raw =
        request_with_fallback(client, &prompts, subject_id, "term enrichment", params).await?;

    let result = raw
        .iter()
        .map(|(key, value)| (normalize_key(key), TermEnrichment::from_value(value)))
        .collect();

    Ok(EnrichmentOutcome {
        subject_id: subject_id.to_string(),
        result,
    })
}

/// Request an example sentence for every extracted phrase.
///
/// The prompt builders collapse conflicting glosses to the primary one, so
/// the backend only ever sees scalar meanings.
pub async fn enrich_phrases<C>(
    client: &C,
    extraction: &ExtractionOutcome<PhraseMap>,
    params: &GenerationParams,
) -> Result<EnrichmentOutcome<PhraseEnrichment>, LlmError>
where
    C: ChatClient + ?Sized,
{
    let subject_id = extraction.subject_id.as_str();
    if extraction.result.is_empty() {
        log::warn!("phrase enrichment: nothing to enrich for '{subject_id}'");
        return Ok(EnrichmentOutcome::empty(subject_id));
    }

    let prompts: Vec<(&'static str, String)> = prompt::phrase_enrichment_variants()
        .iter()
        .map(|variant| (variant.version, (variant.build)(&extraction.result, subject_id)))
        .collect();

    let raw =
        request_with_fallback(client, &prompts, subject_id, "phrase enrichment", params).await?;

    let result = raw
        .iter()
        .map(|(key, value)| (normalize_key(key), PhraseEnrichment::from_value(value)))
        .collect();

    Ok(EnrichmentOutcome {
        subject_id: subject_id.to_string(),
        result,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
