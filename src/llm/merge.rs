//! Normalizing merge of per-chunk extraction results.
//!
//! Each succeeding chunk contributes one raw `result` object; these folds
//! case-fold the keys and reconcile conflicts into the shared accumulators.
//! The folds are commutative with respect to duplicate content and
//! idempotent — merging the same chunk result twice changes nothing — so
//! chunk completion order never affects the outcome beyond first-seen key
//! order.

use serde_json::{Map, Value};

use crate::vocab::record::{normalize_key, scalar_string, string_list};
use crate::vocab::{PartOfSpeech, PhraseMap, TermMap};

// ---------------------------------------------------------------------------
// Term merge
// ---------------------------------------------------------------------------

/// Fold one chunk's term `result` object into the accumulator.
///
/// Per `(term, value)` pair:
/// * key is lower-cased and trimmed; empty keys are dropped,
/// * a known `pos` overwrites the stored one (last-non-empty-wins),
/// * meanings append with exact-string dedup, unbounded — the ≤2 cap is a
///   generation-prompt contract, not re-validated here.
///
/// Tolerated legacy value shapes: a bare meaning string and a bare meaning
/// list both count as `{pos: "", meanings: […]}`.
pub fn merge_term_chunk(acc: &mut TermMap, chunk_result: &Map<String, Value>) {
    for (raw_term, value) in chunk_result {
        let term = normalize_key(raw_term);
        if term.is_empty() {
            continue;
        }

        let (pos, meanings) = match value {
            Value::Object(data) => {
                let pos = data
                    .get("pos")
                    .map(|v| PartOfSpeech::from(scalar_string(v).as_str()))
                    .unwrap_or_default();
                let meanings = data.get("meanings").map(string_list).unwrap_or_default();
                (pos, meanings)
            }
            Value::Array(_) | Value::String(_) => (PartOfSpeech::Unknown, string_list(value)),
            _ => continue,
        };

        let record = acc.entry(&term);
        if !pos.is_unknown() {
            record.pos = pos;
        }
        for meaning in meanings {
            if !record.meanings.contains(&meaning) {
                record.meanings.push(meaning);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Phrase merge
// ---------------------------------------------------------------------------

/// Fold one chunk's phrase `result` object into the accumulator.
///
/// A list-valued meaning contributes only its first element. A new key
/// stores the scalar; a conflicting gloss on an existing key promotes the
/// stored value to a list (existing first, new second); further glosses
/// append with dedup. Single-token phrase keys are an upstream contract
/// violation — they are stored as-is, never rejected.
pub fn merge_phrase_chunk(acc: &mut PhraseMap, chunk_result: &Map<String, Value>) {
    for (raw_phrase, value) in chunk_result {
        let phrase = normalize_key(raw_phrase);
        if phrase.is_empty() {
            continue;
        }

        let candidate = match value {
            Value::Array(items) => items.first().map(scalar_string).unwrap_or_default(),
            other => scalar_string(other),
        };

        acc.merge_gloss(phrase, candidate);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
