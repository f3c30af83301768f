//! Final assembly — left-outer join of extraction and enrichment.
//!
//! Extraction decides *which* entries exist and in what order; enrichment
//! only decorates them. An entry whose key has no enrichment record comes
//! out with empty synonyms/example rather than being dropped.

use crate::llm::enrich::EnrichmentOutcome;
use crate::llm::extract::ExtractionOutcome;
use crate::vocab::{
    PhraseEnrichment, PhraseEntry, PhraseMap, TermEnrichment, TermMap, VocabularyList, WordEntry,
};

/// Join both tracks' extraction and enrichment results into the final
/// vocabulary list.
///
/// Output order is the insertion order of each extraction map — the order
/// keys were first seen across chunks. That ordering is part of the
/// pipeline's contract (tested), so nothing here may sort.
pub fn assemble(
    terms: &ExtractionOutcome<TermMap>,
    phrases: &ExtractionOutcome<PhraseMap>,
    term_enrichment: &EnrichmentOutcome<TermEnrichment>,
    phrase_enrichment: &EnrichmentOutcome<PhraseEnrichment>,
) -> VocabularyList {
    let words = terms
        .result
        .iter()
        .map(|record| {
            let enrichment = term_enrichment.result.get(&record.term);
            WordEntry {
                word: record.term.clone(),
                pos: record.pos,
                meanings: record.meanings.clone(),
                synonyms: enrichment.map(|e| e.synonyms.clone()).unwrap_or_default(),
                example: enrichment.map(|e| e.example.clone()).unwrap_or_default(),
            }
        })
        .collect();

    let phrase_entries = phrases
        .result
        .iter()
        .map(|record| {
            let enrichment = phrase_enrichment.result.get(&record.phrase);
            PhraseEntry {
                phrase: record.phrase.clone(),
                meaning: record.meaning.first().to_string(),
                example: enrichment.map(|e| e.example.clone()).unwrap_or_default(),
            }
        })
        .collect();

    VocabularyList {
        subject_id: terms.subject_id.clone(),
        words,
        phrases: phrase_entries,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::vocab::{MeaningValue, PartOfSpeech, PhraseRecord};

    fn extraction_fixtures() -> (ExtractionOutcome<TermMap>, ExtractionOutcome<PhraseMap>) {
        let mut terms = TermMap::new();
        let record = terms.entry("zebra");
        record.pos = PartOfSpeech::Noun;
        record.meanings.push("얼룩말".into());
        let record = terms.entry("adapt");
        record.pos = PartOfSpeech::Verb;
        record.meanings.push("적응하다".into());

        let mut phrases = PhraseMap::new();
        phrases.push(PhraseRecord {
            phrase: "give up".into(),
            meaning: MeaningValue::Multiple(vec!["포기하다".into(), "단념하다".into()]),
        });

        (
            ExtractionOutcome {
                subject_id: "vid123".into(),
                result: terms,
            },
            ExtractionOutcome {
                subject_id: "vid123".into(),
                result: phrases,
            },
        )
    }

    #[test]
    fn joins_enrichment_by_key() {
        let (terms, phrases) = extraction_fixtures();

        let mut term_result = HashMap::new();
        term_result.insert(
            "zebra".to_string(),
            TermEnrichment {
                synonyms: vec!["equid".into()],
                example: "A zebra crossed the road.".into(),
            },
        );
        let term_enrichment = EnrichmentOutcome {
            subject_id: "vid123".into(),
            result: term_result,
        };
        let phrase_enrichment = EnrichmentOutcome::empty("vid123");

        let list = assemble(&terms, &phrases, &term_enrichment, &phrase_enrichment);

        assert_eq!(list.subject_id, "vid123");
        assert_eq!(list.words[0].word, "zebra");
        assert_eq!(list.words[0].synonyms, vec!["equid"]);
        assert_eq!(list.words[0].example, "A zebra crossed the road.");
    }

    /// Entries without enrichment still appear, with empty decoration.
    #[test]
    fn join_is_left_outer() {
        let (terms, phrases) = extraction_fixtures();
        let term_enrichment = EnrichmentOutcome::empty("vid123");
        let phrase_enrichment = EnrichmentOutcome::empty("vid123");

        let list = assemble(&terms, &phrases, &term_enrichment, &phrase_enrichment);

        assert_eq!(list.words.len(), 2);
        for word in &list.words {
            assert!(word.synonyms.is_empty());
            assert!(word.example.is_empty());
        }
        assert_eq!(list.phrases.len(), 1);
        assert!(list.phrases[0].example.is_empty());
    }

    #[test]
    fn phrase_meaning_collapses_to_primary_gloss() {
        let (terms, phrases) = extraction_fixtures();
        let list = assemble(
            &terms,
            &phrases,
            &EnrichmentOutcome::empty("vid123"),
            &EnrichmentOutcome::empty("vid123"),
        );
        assert_eq!(list.phrases[0].meaning, "포기하다");
    }

    /// Output follows extraction-map insertion order, not alphabetical.
    #[test]
    fn word_order_is_extraction_insertion_order() {
        let (terms, phrases) = extraction_fixtures();
        let list = assemble(
            &terms,
            &phrases,
            &EnrichmentOutcome::empty("vid123"),
            &EnrichmentOutcome::empty("vid123"),
        );

        let order: Vec<&str> = list.words.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(order, vec!["zebra", "adapt"]);
    }
}
