//! Prompt builders for the extraction and enrichment stages.
//!
//! Two kinds:
//! * **Extraction** (`word_extraction`, `phrase_extraction`) — one prompt
//!   per chunk, asking for a `{"result": { … }}` JSON object.
//! * **Enrichment** (`word_enrichment_variants`,
//!   `phrase_enrichment_variants`) — one prompt over the *whole* merged
//!   map, offered as an ordered list of [`PromptVariant`]s. The second
//!   variant restates the request more rigidly for models that ignored the
//!   first one's formatting rules.
//!
//! The exact wording is deliberately not part of the pipeline's contract —
//! only the input (chunk text / merged map + subject id) and the required
//! output shape are.

use crate::vocab::{PhraseMap, TermMap};

// ---------------------------------------------------------------------------
// PromptVariant
// ---------------------------------------------------------------------------

/// A fixed alternative formulation of an enrichment request, tried in a
/// defined fallback order (first success wins).
pub struct PromptVariant<T> {
    /// Short label used in logs (`"v1"`, `"v2"`).
    pub version: &'static str,
    /// Builds the prompt from the merged extraction map and subject id.
    pub build: fn(&T, &str) -> String,
}

// ---------------------------------------------------------------------------
// Extraction prompts
// ---------------------------------------------------------------------------

/// Stage-1 word extraction prompt for one chunk.
pub fn word_extraction(chunk_text: &str, subject_id: &str) -> String {
    format!(
        r#"The following is a transcript excerpt from a spoken-language recording. Extract every English word worth studying and give the natural Korean meaning(s) it carries in this context, at most 2 per word.

Text:
{chunk_text}

Requirements:
1. Reduce each word to its dictionary form ("cats" -> "cat", "going" -> "go", "worked" -> "work").
2. Include only nouns, verbs, adjectives and adverbs. Skip articles (a, an, the), prepositions, conjunctions, pronouns, auxiliaries and interjections (hello, yeah, wow).
3. Tag each word with exactly one of these abbreviations: "n" (noun), "v" (verb), "adj" (adjective), "adv" (adverb).
4. Meanings must be Korean; when a word is ambiguous, pick the closest dictionary sense for this context.
5. Answer with ONLY this JSON shape:

{{
  "subjectId": "{subject_id}",
  "result": {{
    "word1": {{"pos": "n", "meanings": ["뜻1", "뜻2"]}},
    "word2": {{"pos": "v", "meanings": ["뜻1"]}}
  }}
}}

Important:
- Normalize every word to lower case.
- Do not include any text outside the JSON. Invalid JSON breaks parsing.
"#
    )
}

/// Stage-1 phrase extraction prompt for one chunk.
pub fn phrase_extraction(chunk_text: &str, subject_id: &str) -> String {
    format!(
        r#"The following is a transcript excerpt from a spoken-language recording. Extract the English multi-word expressions it contains and give the natural Korean meaning each one carries in this context.

Text:
{chunk_text}

Requirements:
1. Extract only expressions with a meaning of their own:
   - idioms, e.g. "break the ice", "once in a blue moon"
   - phrasal verbs, e.g. "give up", "look forward to"
   - collocations, e.g. "make a decision", "take a break"
2. Skip ordinary word sequences that mean nothing beyond their parts.
3. Meanings must be Korean.
4. Answer with ONLY this JSON shape:

{{
  "subjectId": "{subject_id}",
  "result": {{
    "phrase1": "뜻1",
    "phrase2": "뜻2"
  }}
}}

Important:
- Normalize every phrase to lower case.
- Do not include any text outside the JSON. Invalid JSON breaks parsing.
"#
    )
}

// ---------------------------------------------------------------------------
// Enrichment prompts — words
// ---------------------------------------------------------------------------

fn word_enrichment_v1(terms: &TermMap, subject_id: &str) -> String {
    let listing = term_listing(terms);
    format!(
        r#"For each word below, provide English synonyms (at most 2) and one new English example sentence that matches the listed meaning.

Words:
{listing}

Requirements:
1. Synonyms must be English words, never Korean glosses.
2. Exactly one example sentence per word, written in English.
3. Answer with ONLY this JSON shape:

{{
  "subjectId": "{subject_id}",
  "result": {{
    "word1": {{"synonyms": ["synonym1", "synonym2"], "example": "Example sentence in English."}},
    "word2": {{"synonyms": ["synonym1"], "example": "Example sentence in English."}}
  }}
}}

Important:
- Do not include any text outside the JSON. Invalid JSON breaks parsing.
"#
    )
}

/// Stricter restatement used when the first variant came back malformed.
fn word_enrichment_v2(terms: &TermMap, subject_id: &str) -> String {
    let listing = term_listing(terms);
    format!(
        r#"You are a JSON generator. Output a single JSON object and nothing else: no explanation, no markdown, no code fences.

Task: for every word in the list, produce up to 2 English synonyms and exactly 1 English example sentence.

Word list:
{listing}

Output schema (keys must match the word list exactly, in lower case):
{{"subjectId": "{subject_id}", "result": {{"<word>": {{"synonyms": ["..."], "example": "..."}}}}}}

Every word in the list MUST appear as a key under "result". Start your answer with '{{' and end it with '}}'.
"#
    )
}

/// The ordered word-enrichment fallback ladder.
pub fn word_enrichment_variants() -> [PromptVariant<TermMap>; 2] {
    [
        PromptVariant {
            version: "v1",
            build: word_enrichment_v1,
        },
        PromptVariant {
            version: "v2",
            build: word_enrichment_v2,
        },
    ]
}

// ---------------------------------------------------------------------------
// Enrichment prompts — phrases
// ---------------------------------------------------------------------------

fn phrase_enrichment_v1(phrases: &PhraseMap, subject_id: &str) -> String {
    let listing = phrase_listing(phrases);
    format!(
        r#"For each expression below, write one new English example sentence that uses it with the listed meaning.

Expressions:
{listing}

Requirements:
1. Exactly one example sentence per expression, written in English.
2. The sentence must be new — not a quote from the source recording.
3. Answer with ONLY this JSON shape:

{{
  "subjectId": "{subject_id}",
  "result": {{
    "phrase1": {{"example": "Example sentence in English using the phrase."}},
    "phrase2": {{"example": "Example sentence in English using the phrase."}}
  }}
}}

Important:
- Do not include any text outside the JSON. Invalid JSON breaks parsing.
"#
    )
}

/// Stricter restatement used when the first variant came back malformed.
fn phrase_enrichment_v2(phrases: &PhraseMap, subject_id: &str) -> String {
    let listing = phrase_listing(phrases);
    format!(
        r#"You are a JSON generator. Output a single JSON object and nothing else: no explanation, no markdown, no code fences.

Task: for every expression in the list, produce exactly 1 English example sentence that uses it.

Expression list:
{listing}

Output schema (keys must match the expression list exactly, in lower case):
{{"subjectId": "{subject_id}", "result": {{"<phrase>": {{"example": "..."}}}}}}

Every expression in the list MUST appear as a key under "result". Start your answer with '{{' and end it with '}}'.
"#
    )
}

/// The ordered phrase-enrichment fallback ladder.
pub fn phrase_enrichment_variants() -> [PromptVariant<PhraseMap>; 2] {
    [
        PromptVariant {
            version: "v1",
            build: phrase_enrichment_v1,
        },
        PromptVariant {
            version: "v2",
            build: phrase_enrichment_v2,
        },
    ]
}

// ---------------------------------------------------------------------------
// Listing helpers
// ---------------------------------------------------------------------------

/// `- word: meaning1, meaning2` lines in map insertion order.
fn term_listing(terms: &TermMap) -> String {
    terms
        .iter()
        .map(|record| format!("- {}: {}", record.term, record.meanings.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `- phrase: meaning` lines, collapsed to each phrase's primary gloss so
/// the prompt never shows a conflicting-meaning list.
fn phrase_listing(phrases: &PhraseMap) -> String {
    phrases
        .iter()
        .map(|record| format!("- {}: {}", record.phrase, record.meaning.first()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{MeaningValue, PartOfSpeech, PhraseRecord};

    fn sample_terms() -> TermMap {
        let mut terms = TermMap::new();
        let record = terms.entry("innovation");
        record.pos = PartOfSpeech::Noun;
        record.meanings.push("혁신".into());
        terms
    }

    fn sample_phrases() -> PhraseMap {
        let mut phrases = PhraseMap::new();
        phrases.push(PhraseRecord {
            phrase: "break the ice".into(),
            meaning: MeaningValue::Multiple(vec!["긴장을 풀다".into(), "어색함을 깨다".into()]),
        });
        phrases
    }

    #[test]
    fn word_extraction_embeds_chunk_and_subject() {
        let prompt = word_extraction("we need more innovation", "vid123");
        assert!(prompt.contains("we need more innovation"));
        assert!(prompt.contains("\"subjectId\": \"vid123\""));
        assert!(prompt.contains("\"result\""));
        assert!(prompt.contains("\"adv\""));
    }

    #[test]
    fn phrase_extraction_embeds_chunk_and_subject() {
        let prompt = phrase_extraction("let's break the ice", "vid123");
        assert!(prompt.contains("let's break the ice"));
        assert!(prompt.contains("\"subjectId\": \"vid123\""));
        assert!(prompt.contains("phrasal verbs"));
    }

    #[test]
    fn word_enrichment_variants_are_ordered_and_distinct() {
        let variants = word_enrichment_variants();
        assert_eq!(variants[0].version, "v1");
        assert_eq!(variants[1].version, "v2");

        let terms = sample_terms();
        let first = (variants[0].build)(&terms, "vid123");
        let second = (variants[1].build)(&terms, "vid123");
        assert_ne!(first, second);
        // Both carry the full word listing.
        assert!(first.contains("- innovation: 혁신"));
        assert!(second.contains("- innovation: 혁신"));
    }

    #[test]
    fn phrase_enrichment_listing_uses_primary_gloss_only() {
        let variants = phrase_enrichment_variants();
        let phrases = sample_phrases();
        for variant in &variants {
            let prompt = (variant.build)(&phrases, "vid123");
            assert!(prompt.contains("- break the ice: 긴장을 풀다"));
            assert!(!prompt.contains("어색함을 깨다"));
        }
    }
}
