//! Configuration module for transcript-vocab.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the LLM
//! backend and the chunker, `AppPaths` for cross-platform config
//! directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ChunkConfig, LlmConfig};
