//! Working records built up during extraction and enrichment.
//!
//! These are the mutable accumulator types the merge stage writes into.
//! Keys ([`TermRecord::term`], [`PhraseRecord::phrase`]) are always
//! lower-cased and trimmed before insertion — see [`normalize_key`].
//!
//! [`TermMap`] and [`PhraseMap`] are deliberately `Vec`-backed instead of
//! hash maps: the final word/phrase lists must come out in the order the
//! merge first saw each key, and a vocabulary list is small enough that a
//! linear key scan costs nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Key normalization
// ---------------------------------------------------------------------------

/// Lower-case and trim a raw term/phrase key from the generator.
///
/// Every merge and join in the pipeline goes through this — it is the only
/// reason `"Innovation"` from one chunk and `"innovation"` from another end
/// up as a single vocabulary entry.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// PartOfSpeech
// ---------------------------------------------------------------------------

/// Part-of-speech tag as the extraction prompt defines it.
///
/// The generator is instructed to answer with one of the abbreviations
/// `"n"`, `"v"`, `"adj"`, `"adv"` — but it is not trusted to comply, so any
/// unrecognized string decodes to [`PartOfSpeech::Unknown`] instead of
/// failing the whole chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartOfSpeech {
    /// Noun (`"n"`).
    Noun,
    /// Verb (`"v"`).
    Verb,
    /// Adjective (`"adj"`).
    Adjective,
    /// Adverb (`"adv"`).
    Adverb,
    /// Missing or unrecognized tag — serialized as `""`.
    #[default]
    Unknown,
}

impl PartOfSpeech {
    /// The wire abbreviation for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "n",
            PartOfSpeech::Verb => "v",
            PartOfSpeech::Adjective => "adj",
            PartOfSpeech::Adverb => "adv",
            PartOfSpeech::Unknown => "",
        }
    }

    /// `true` when this is the [`Unknown`](PartOfSpeech::Unknown) tag.
    ///
    /// The merger only overwrites an existing tag with a known one
    /// (last-non-empty-wins), so this check gates every overwrite.
    pub fn is_unknown(&self) -> bool {
        matches!(self, PartOfSpeech::Unknown)
    }
}

impl From<&str> for PartOfSpeech {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "n" => PartOfSpeech::Noun,
            "v" => PartOfSpeech::Verb,
            "adj" => PartOfSpeech::Adjective,
            "adv" => PartOfSpeech::Adverb,
            _ => PartOfSpeech::Unknown,
        }
    }
}

impl Serialize for PartOfSpeech {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PartOfSpeech {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PartOfSpeech::from(raw.as_str()))
    }
}

// ---------------------------------------------------------------------------
// MeaningValue
// ---------------------------------------------------------------------------

/// A phrase meaning — a single gloss, or several when different chunks
/// disagreed about the same phrase.
///
/// Starts life as [`Single`](MeaningValue::Single); the merger promotes it to
/// [`Multiple`](MeaningValue::Multiple) the first time a conflicting gloss
/// arrives (existing gloss first, new one second).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeaningValue {
    /// One agreed-upon gloss.
    Single(String),
    /// Conflicting glosses in arrival order.
    Multiple(Vec<String>),
}

impl MeaningValue {
    /// The primary gloss — the `Single` value, or the first `Multiple`
    /// element. Empty string when a `Multiple` is somehow empty.
    pub fn first(&self) -> &str {
        match self {
            MeaningValue::Single(meaning) => meaning,
            MeaningValue::Multiple(meanings) => {
                meanings.first().map(String::as_str).unwrap_or("")
            }
        }
    }

    /// Fold another gloss into this value.
    ///
    /// * `Single(x)` + `x` → unchanged (exact-equality dedup).
    /// * `Single(x)` + `y` → `Multiple([x, y])`.
    /// * `Multiple(xs)` + `y` → append `y` unless already present.
    pub fn merge(&mut self, candidate: String) {
        match self {
            MeaningValue::Single(existing) => {
                if *existing != candidate {
                    let promoted = vec![std::mem::take(existing), candidate];
                    *self = MeaningValue::Multiple(promoted);
                }
            }
            MeaningValue::Multiple(meanings) => {
                if !meanings.contains(&candidate) {
                    meanings.push(candidate);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TermRecord / PhraseRecord
// ---------------------------------------------------------------------------

/// One extracted word with its tag and context meanings.
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecord {
    /// Normalized (lower-cased, trimmed) dictionary form.
    pub term: String,
    /// Part-of-speech tag; last non-empty value across chunks wins.
    pub pos: PartOfSpeech,
    /// Context meanings, deduplicated by exact string equality.
    pub meanings: Vec<String>,
}

/// One extracted multi-word phrase (idiom, phrasal verb, collocation).
///
/// A single-token `phrase` is a contract violation by the generator; the
/// merger stores it anyway rather than crash — validation is not its job.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseRecord {
    /// Normalized (lower-cased, trimmed) phrase.
    pub phrase: String,
    /// Gloss(es) — see [`MeaningValue`].
    pub meaning: MeaningValue,
}

// ---------------------------------------------------------------------------
// TermMap / PhraseMap (insertion-ordered accumulators)
// ---------------------------------------------------------------------------

/// Insertion-ordered collection of [`TermRecord`]s keyed by normalized term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermMap {
    records: Vec<TermRecord>,
}

impl TermMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no terms were merged.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its (already normalized) term.
    pub fn get(&self, term: &str) -> Option<&TermRecord> {
        self.records.iter().find(|r| r.term == term)
    }

    /// Fetch the record for `term`, inserting an empty one at the back if
    /// the key is new. `term` must already be normalized.
    pub fn entry(&mut self, term: &str) -> &mut TermRecord {
        let idx = match self.records.iter().position(|r| r.term == term) {
            Some(idx) => idx,
            None => {
                self.records.push(TermRecord {
                    term: term.to_string(),
                    pos: PartOfSpeech::Unknown,
                    meanings: Vec::new(),
                });
                self.records.len() - 1
            }
        };
        &mut self.records[idx]
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TermRecord> {
        self.records.iter()
    }
}

/// Insertion-ordered collection of [`PhraseRecord`]s keyed by normalized
/// phrase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhraseMap {
    records: Vec<PhraseRecord>,
}

impl PhraseMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no phrases were merged.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its (already normalized) phrase.
    pub fn get(&self, phrase: &str) -> Option<&PhraseRecord> {
        self.records.iter().find(|r| r.phrase == phrase)
    }

    /// Append a new record. The caller is responsible for having checked
    /// that the key is not already present.
    pub fn push(&mut self, record: PhraseRecord) {
        self.records.push(record);
    }

    /// Fold `candidate` into the record for `phrase` (already normalized),
    /// inserting a fresh [`MeaningValue::Single`] record when the key is
    /// unseen — see [`MeaningValue::merge`] for the conflict rules.
    pub fn merge_gloss(&mut self, phrase: String, candidate: String) {
        if let Some(idx) = self.records.iter().position(|r| r.phrase == phrase) {
            self.records[idx].meaning.merge(candidate);
        } else {
            self.records.push(PhraseRecord {
                phrase,
                meaning: MeaningValue::Single(candidate),
            });
        }
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PhraseRecord> {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// Enrichment records
// ---------------------------------------------------------------------------

/// Synonyms and usage example produced for one term by the enrichment stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermEnrichment {
    /// English synonyms (the prompt asks for at most two).
    pub synonyms: Vec<String>,
    /// One fresh English example sentence.
    pub example: String,
}

impl TermEnrichment {
    /// Coerce a raw generator value into an enrichment record.
    ///
    /// `synonyms` may arrive as a string or a list; `example` as a string.
    /// Anything else degrades to empty fields — enrichment is best-effort
    /// decoration, never a reason to drop the underlying term.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            synonyms: obj.get("synonyms").map(string_list).unwrap_or_default(),
            example: obj.get("example").map(scalar_string).unwrap_or_default(),
        }
    }
}

/// Usage example produced for one phrase by the enrichment stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhraseEnrichment {
    /// One fresh English example sentence using the phrase.
    pub example: String,
}

impl PhraseEnrichment {
    /// Coerce a raw generator value; see [`TermEnrichment::from_value`].
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            example: obj.get("example").map(scalar_string).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire-value coercion helpers
// ---------------------------------------------------------------------------

/// Coerce a JSON scalar to a string; arrays/objects/null become `""`.
pub(crate) fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Coerce a JSON value to a list of non-empty strings.
///
/// A bare string becomes a one-element list; an array keeps its string-able
/// elements; everything else becomes empty.
pub(crate) fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .map(scalar_string)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
