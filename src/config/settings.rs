//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection and retry settings for the chat-completion backend.
///
/// Works with any provider that speaks the OpenAI chat-completions wire
/// format — vLLM, Ollama (OpenAI mode), OpenAI, Groq, LM Studio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the backend (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Chat-completion path appended to `base_url`.
    pub chat_completion_path: String,
    /// API key — `None` for local providers that need no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f32,
    /// `max_tokens` sent with every request — the completion budget,
    /// unrelated to the chunker's input-token bound.
    pub max_completion_tokens: u32,
    /// Seconds to wait for a single HTTP response before timing out.
    pub timeout_secs: u64,
    /// Total request attempts per logical call (min 1).
    pub max_retries: u32,
    /// Base backoff unit in seconds; attempt *n* waits `n × retry_delay`.
    pub retry_delay_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            chat_completion_path: "/v1/chat/completions".into(),
            api_key: None,
            model: "Qwen/Qwen2.5-14B-Instruct-AWQ".into(),
            temperature: 0.7,
            max_completion_tokens: 4096,
            timeout_secs: 60,
            max_retries: 3,
            retry_delay_secs: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// ChunkConfig
// ---------------------------------------------------------------------------

/// Settings for transcript chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Token bound per chunk. A single oversized segment may still exceed
    /// this — see the chunker docs.
    pub max_tokens: usize,
    /// Characters-per-token ratio for the default token estimate.
    pub chars_per_token: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            chars_per_token: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use transcript_vocab::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection / retry settings.
    pub llm: LlmConfig,
    /// Transcript chunking settings.
    pub chunk: ChunkConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(
            original.llm.chat_completion_path,
            loaded.llm.chat_completion_path
        );
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.model, loaded.llm.model);
        assert_eq!(original.llm.temperature, loaded.llm.temperature);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);
        assert_eq!(original.llm.max_retries, loaded.llm.max_retries);
        assert_eq!(original.llm.retry_delay_secs, loaded.llm.retry_delay_secs);
        assert_eq!(original.chunk.max_tokens, loaded.chunk.max_tokens);
        assert_eq!(original.chunk.chars_per_token, loaded.chunk.chars_per_token);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.llm.model, default.llm.model);
        assert_eq!(config.chunk.max_tokens, default.chunk.max_tokens);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.base_url = "https://api.openai.com".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.model = "gpt-4o-mini".into();
        cfg.llm.max_retries = 5;
        cfg.llm.retry_delay_secs = 1;
        cfg.chunk.max_tokens = 800;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.base_url, "https://api.openai.com");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.model, "gpt-4o-mini");
        assert_eq!(loaded.llm.max_retries, 5);
        assert_eq!(loaded.llm.retry_delay_secs, 1);
        assert_eq!(loaded.chunk.max_tokens, 800);
    }
}
