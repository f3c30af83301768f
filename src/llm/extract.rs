//! Stage-1 extraction coordinator — concurrent per-chunk fan-out.
//!
//! One generation call per chunk, all in flight at once; each response is
//! parsed and validated independently, and a failing chunk is logged and
//! dropped rather than failing the stage. After the fan-in, the surviving
//! results are folded through the normalizing merge in chunk order on the
//! calling task — the accumulator is never shared, so no locking.

use futures::future;
use serde_json::{Map, Value};

use crate::llm::client::{ChatClient, ChatMessage, GenerationParams, LlmError};
use crate::llm::{merge, prompt};
use crate::transcript::Chunk;
use crate::vocab::{PhraseMap, TermMap};

// ---------------------------------------------------------------------------
// ExtractionOutcome
// ---------------------------------------------------------------------------

/// A merged stage-1 result for one track (terms or phrases).
#[derive(Debug, Clone)]
pub struct ExtractionOutcome<M> {
    /// Identifier of the transcript being processed.
    pub subject_id: String,
    /// The merged accumulator.
    pub result: M,
}

// ---------------------------------------------------------------------------
// Response-shape validation
// ---------------------------------------------------------------------------

/// Parse generated content as JSON and pull out the required `result`
/// object. Any other shape — non-JSON, a `result` that is not an object, a
/// missing key — is a malformed response.
///
/// An empty-but-well-formed `result` is fine; it simply contributes
/// nothing to the merge.
pub(crate) fn parse_result_object(content: &str) -> Result<Map<String, Value>, LlmError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| LlmError::Parse(e.to_string()))?;
    match value.get("result") {
        Some(Value::Object(map)) => Ok(map.clone()),
        _ => Err(LlmError::InvalidShape),
    }
}

// ---------------------------------------------------------------------------
// Generic fan-out
// ---------------------------------------------------------------------------

/// One chunk's call: prompt → gateway → parse → validate.
async fn extract_chunk<C>(
    client: &C,
    prompt_text: String,
    params: &GenerationParams,
) -> Result<Map<String, Value>, LlmError>
where
    C: ChatClient + ?Sized,
{
    let messages = [ChatMessage::user(prompt_text)];
    let content = client
        .complete(&messages, params.temperature, params.max_tokens)
        .await?;
    parse_result_object(&content)
}

/// Fan out one call per chunk, wait for all of them, then fold the
/// successes through `fold` in chunk order.
///
/// This never fails: a chunk that errors (transport after retries, parse,
/// shape, empty content) is logged and skipped. Whether "everything was
/// skipped" is acceptable is the pipeline's decision, not this stage's.
pub async fn extract_from_chunks<C, M, P, F>(
    client: &C,
    chunks: &[Chunk],
    subject_id: &str,
    process: &str,
    build_prompt: P,
    mut fold: F,
    params: &GenerationParams,
) -> ExtractionOutcome<M>
where
    C: ChatClient + ?Sized,
    M: Default,
    P: Fn(&str, &str) -> String,
    F: FnMut(&mut M, &Map<String, Value>),
{
    let total = chunks.len();
    log::info!("{process}: fanning out over {total} chunks for '{subject_id}'");

    let calls = chunks
        .iter()
        .map(|chunk| extract_chunk(client, build_prompt(&chunk.text, subject_id), params));
    let results = future::join_all(calls).await;

    let mut merged = M::default();
    for (idx, outcome) in results.into_iter().enumerate() {
        match outcome {
            Ok(map) => fold(&mut merged, &map),
            Err(e) => log::error!(
                "{process}: skipping chunk {}/{total} for '{subject_id}': {e}",
                idx + 1
            ),
        }
    }

    ExtractionOutcome {
        subject_id: subject_id.to_string(),
        result: merged,
    }
}

// ---------------------------------------------------------------------------
// Track entry points
// ---------------------------------------------------------------------------

/// Extract and merge words across all chunks.
pub async fn extract_terms<C>(
    client: &C,
    chunks: &[Chunk],
    subject_id: &str,
    params: &GenerationParams,
) -> ExtractionOutcome<TermMap>
where
    C: ChatClient + ?Sized,
{
    let outcome = extract_from_chunks(
        client,
        chunks,
        subject_id,
        "term extraction",
        prompt::word_extraction,
        merge::merge_term_chunk,
        params,
    )
    .await;
    log::info!(
        "term extraction: merged {} terms for '{subject_id}'",
        outcome.result.len()
    );
    outcome
}

/// Extract and merge phrases across all chunks.
pub async fn extract_phrases<C>(
    client: &C,
    chunks: &[Chunk],
    subject_id: &str,
    params: &GenerationParams,
) -> ExtractionOutcome<PhraseMap>
where
    C: ChatClient + ?Sized,
{
    let outcome = extract_from_chunks(
        client,
        chunks,
        subject_id,
        "phrase extraction",
        prompt::phrase_extraction,
        merge::merge_phrase_chunk,
        params,
    )
    .await;
    log::info!(
        "phrase extraction: merged {} phrases for '{subject_id}'",
        outcome.result.len()
    );
    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
