//! Final, read-only vocabulary output types.
//!
//! [`VocabularyList`] is what the pipeline hands back to its caller — one
//! per transcript, created exactly once by the assembler and serialized as:
//!
//! ```json
//! {
//!   "subjectId": "…",
//!   "words":   [{"word": "…", "pos": "n", "meanings": ["…"],
//!                "synonyms": ["…"], "example": "…"}],
//!   "phrases": [{"phrase": "…", "meaning": "…", "example": "…"}]
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::record::PartOfSpeech;

// ---------------------------------------------------------------------------
// WordEntry
// ---------------------------------------------------------------------------

/// One fully assembled word: extraction fields joined with enrichment
/// fields. `synonyms`/`example` are empty when enrichment had nothing for
/// this word (left-outer join).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Normalized dictionary form.
    pub word: String,
    /// Part-of-speech abbreviation (`"n"`, `"v"`, `"adj"`, `"adv"`, `""`).
    pub pos: PartOfSpeech,
    /// Context meanings from extraction.
    pub meanings: Vec<String>,
    /// English synonyms from enrichment.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// English example sentence from enrichment.
    #[serde(default)]
    pub example: String,
}

// ---------------------------------------------------------------------------
// PhraseEntry
// ---------------------------------------------------------------------------

/// One fully assembled phrase. `meaning` is the primary gloss — when the
/// merge collected conflicting glosses, only the first survives assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseEntry {
    /// Normalized phrase.
    pub phrase: String,
    /// Primary gloss.
    pub meaning: String,
    /// English example sentence from enrichment.
    #[serde(default)]
    pub example: String,
}

// ---------------------------------------------------------------------------
// VocabularyList
// ---------------------------------------------------------------------------

/// The pipeline's aggregate result for one transcript.
///
/// Both lists keep the insertion order of their extraction maps — the order
/// terms first appeared across chunks — never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyList {
    /// Identifier of the transcript this list was generated from.
    #[serde(rename = "subjectId")]
    pub subject_id: String,
    /// Assembled word entries.
    pub words: Vec<WordEntry>,
    /// Assembled phrase entries.
    pub phrases: Vec<PhraseEntry>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_subject_id() {
        let list = VocabularyList {
            subject_id: "vid123".into(),
            words: vec![WordEntry {
                word: "innovation".into(),
                pos: PartOfSpeech::Noun,
                meanings: vec!["혁신".into()],
                synonyms: vec!["novelty".into()],
                example: "The lab rewards innovation.".into(),
            }],
            phrases: vec![PhraseEntry {
                phrase: "break the ice".into(),
                meaning: "긴장을 풀다".into(),
                example: "They played a game to break the ice.".into(),
            }],
        };

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["subjectId"], "vid123");
        assert_eq!(json["words"][0]["pos"], "n");
        assert_eq!(json["phrases"][0]["phrase"], "break the ice");
    }

    #[test]
    fn round_trips_through_json() {
        let list = VocabularyList {
            subject_id: "vid123".into(),
            words: vec![],
            phrases: vec![PhraseEntry {
                phrase: "give up".into(),
                meaning: "포기하다".into(),
                example: String::new(),
            }],
        };

        let text = serde_json::to_string(&list).unwrap();
        let back: VocabularyList = serde_json::from_str(&text).unwrap();
        assert_eq!(back, list);
    }
}
