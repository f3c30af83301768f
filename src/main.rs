//! Command-line entry point — transcript JSON in, vocabulary JSON out.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Read and parse the transcript segments file.
//! 4. Chunk the segments under the configured token bound.
//! 5. Run the vocabulary pipeline against the configured backend.
//! 6. Print the resulting list as pretty JSON on stdout.
//!
//! # Usage
//!
//! ```text
//! transcript-vocab <segments.json> <subject-id>
//! ```
//!
//! `segments.json` is an array of `{"text": "...", "start_secs": ...,
//! "duration_secs": ...}` objects (timestamps optional).

use anyhow::{bail, Context, Result};

use transcript_vocab::config::AppConfig;
use transcript_vocab::pipeline::VocabularyPipeline;
use transcript_vocab::transcript::{CharTokenCounter, Segment, TranscriptChunker};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (Some(path), Some(subject_id)) = (args.next(), args.next()) else {
        bail!("usage: transcript-vocab <segments.json> <subject-id>");
    };

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let segments: Vec<Segment> =
        serde_json::from_str(&raw).with_context(|| format!("parsing segments from {path}"))?;
    log::info!("loaded {} segments from {path}", segments.len());

    let chunker = TranscriptChunker::new(
        config.chunk.max_tokens,
        CharTokenCounter::new(config.chunk.chars_per_token),
    );
    let chunks = chunker.chunk(&segments);

    let pipeline = VocabularyPipeline::new(config);
    let list = pipeline.generate(&chunks, &subject_id).await?;

    println!("{}", serde_json::to_string_pretty(&list)?);
    Ok(())
}
