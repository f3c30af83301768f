//! Vocabulary data model.
//!
//! Two layers:
//! * [`record`] — mutable, insertion-ordered accumulators the extraction
//!   merge and enrichment stages write into.
//! * [`entry`] — the immutable, serializable output the assembler produces.

pub mod entry;
pub mod record;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use entry::{PhraseEntry, VocabularyList, WordEntry};
pub use record::{
    normalize_key, MeaningValue, PartOfSpeech, PhraseEnrichment, PhraseMap, PhraseRecord,
    TermEnrichment, TermMap, TermRecord,
};
