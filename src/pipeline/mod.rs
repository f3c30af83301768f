//! Pipeline module — orchestration and final assembly.
//!
//! [`VocabularyPipeline`] is the crate's main entry point: it takes
//! pre-chunked transcript text and a subject id, runs both extraction
//! tracks concurrently, both enrichment tracks concurrently, and joins the
//! results into a [`VocabularyList`](crate::vocab::VocabularyList).

pub mod assemble;
pub mod processor;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use assemble::assemble;
pub use processor::{PipelineError, VocabularyPipeline};
