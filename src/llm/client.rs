//! Core `ChatClient` trait and `GatewayClient` implementation.
//!
//! `GatewayClient` calls any OpenAI-compatible chat-completions endpoint —
//! vLLM, Ollama (OpenAI mode), OpenAI, Groq, LM Studio, etc. All connection
//! details come from [`LlmConfig`]; nothing is hardcoded.
//!
//! One [`complete`](ChatClient::complete) call is one logical generation:
//! transport failures are retried with linear backoff inside the client,
//! while malformed response bodies are surfaced immediately for the
//! coordinators to recover from (chunk-skip or prompt-variant fallback).
//! The client holds no cross-call state — construct one, use it, drop it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the generation backend.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP status {0}")]
    Status(u16),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The HTTP response (or its content) could not be parsed as expected
    /// JSON.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The backend returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,

    /// The generated content parsed as JSON but is missing the required
    /// `result` object.
    #[error("generated JSON is missing a `result` object")]
    InvalidShape,
}

impl LlmError {
    /// Transport-level failures are retried inside the gateway client;
    /// everything else is a malformed-response failure handled one level up
    /// (chunk-skip during extraction, variant fallback during enrichment).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LlmError::Request(_) | LlmError::Status(_) | LlmError::Timeout
        )
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage / GenerationParams
// ---------------------------------------------------------------------------

/// One role-tagged message in a chat-completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// `"user"`, `"system"` or `"assistant"`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Per-call sampling knobs, derived from [`LlmConfig`].
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token budget (`max_tokens` on the wire).
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

impl From<&LlmConfig> for GenerationParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_completion_tokens,
        }
    }
}

// ---------------------------------------------------------------------------
// ChatClient trait
// ---------------------------------------------------------------------------

/// Async trait for one logical "generate text from messages" call.
///
/// Implementors must be `Send + Sync` so coordinators can share a reference
/// across their concurrent per-chunk futures.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Generate text for `messages`, returning the content of the first
    /// choice with any wrapping code fence already stripped.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// GatewayClient
// ---------------------------------------------------------------------------

/// Production [`ChatClient`] over `reqwest`.
///
/// Constructed per coordinator invocation and dropped afterward — there is
/// deliberately no shared global instance.
pub struct GatewayClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl GatewayClient {
    /// Build a `GatewayClient` from backend config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`. A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// One raw request/response cycle. Transport errors map onto the
    /// retryable [`LlmError`] variants; a body that is not JSON is a parse
    /// error and is not retried.
    async fn send_once(&self, url: &str, body: &Value) -> Result<Value, LlmError> {
        let mut request = self.client.post(url).json(body);

        // Attach Authorization header only when api_key is a non-empty string.
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ChatClient for GatewayClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}{}", self.config.base_url, self.config.chat_completion_path);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages":    messages,
            "temperature": temperature,
            "max_tokens":  max_tokens,
        });

        let attempts = self.config.max_retries.max(1);
        let mut last_transport = None;

        for attempt in 1..=attempts {
            log::debug!("gateway: attempt {attempt}/{attempts} POST {url}");

            match self.send_once(&url, &body).await {
                Ok(response) => return extract_content(&response),
                Err(e) if e.is_transport() => {
                    log::warn!("gateway: attempt {attempt}/{attempts} failed: {e}");
                    if attempt < attempts {
                        let delay = self.config.retry_delay_secs * u64::from(attempt);
                        tokio::time::sleep(Duration::from_secs(delay)).await;
                    }
                    last_transport = Some(e);
                }
                // Malformed body — retrying the same request won't fix it.
                Err(e) => return Err(e),
            }
        }

        Err(last_transport
            .unwrap_or_else(|| LlmError::Request("no request attempts were made".into())))
    }
}

// ---------------------------------------------------------------------------
// Response unwrapping
// ---------------------------------------------------------------------------

/// Pull `choices[0].message.content` out of a chat-completion response and
/// strip any wrapping code fence.
fn extract_content(response: &Value) -> Result<String, LlmError> {
    let content = response
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| LlmError::Parse("missing choices[0].message.content".into()))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(strip_code_fence(content).to_string())
}

/// Strip one leading/trailing fenced code block (```` ``` ````, optionally
/// tagged, e.g. ```` ```json ````). Some models wrap JSON output in one
/// despite being told not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the fence line (including any language tag).
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = rest[newline + 1..].trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_config() -> LlmConfig {
        LlmConfig {
            retry_delay_secs: 0,
            ..LlmConfig::default()
        }
    }

    // -----------------------------------------------------------------------
    // Code-fence stripping
    // -----------------------------------------------------------------------

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(strip_code_fence(r#"{"result": {}}"#), r#"{"result": {}}"#);
    }

    #[test]
    fn strips_untagged_fence() {
        let wrapped = "```\n{\"result\": {}}\n```";
        assert_eq!(strip_code_fence(wrapped), "{\"result\": {}}");
    }

    #[test]
    fn strips_json_tagged_fence() {
        let wrapped = "```json\n{\"result\": {\"a\": 1}}\n```";
        assert_eq!(strip_code_fence(wrapped), "{\"result\": {\"a\": 1}}");
    }

    #[test]
    fn strips_unclosed_fence() {
        let wrapped = "```json\n{\"result\": {}}";
        assert_eq!(strip_code_fence(wrapped), "{\"result\": {}}");
    }

    #[test]
    fn fence_without_newline_is_left_alone() {
        assert_eq!(strip_code_fence("```"), "```");
    }

    // -----------------------------------------------------------------------
    // Content extraction
    // -----------------------------------------------------------------------

    #[test]
    fn extracts_trimmed_content() {
        let response = json!({
            "choices": [{"message": {"content": "  hello  "}}]
        });
        assert_eq!(extract_content(&response).unwrap(), "hello");
    }

    #[test]
    fn empty_choices_is_parse_error() {
        let response = json!({"choices": []});
        assert!(matches!(
            extract_content(&response),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn missing_message_is_parse_error() {
        let response = json!({"choices": [{"index": 0}]});
        assert!(matches!(
            extract_content(&response),
            Err(LlmError::Parse(_))
        ));
    }

    #[test]
    fn blank_content_is_empty_response() {
        let response = json!({"choices": [{"message": {"content": "   "}}]});
        assert!(matches!(
            extract_content(&response),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn fenced_content_is_unwrapped() {
        let response = json!({
            "choices": [{"message": {"content": "```json\n{\"result\": {}}\n```"}}]
        });
        assert_eq!(extract_content(&response).unwrap(), "{\"result\": {}}");
    }

    // -----------------------------------------------------------------------
    // Error taxonomy
    // -----------------------------------------------------------------------

    #[test]
    fn transport_classification() {
        assert!(LlmError::Request("refused".into()).is_transport());
        assert!(LlmError::Status(503).is_transport());
        assert!(LlmError::Timeout.is_transport());
        assert!(!LlmError::Parse("bad json".into()).is_transport());
        assert!(!LlmError::EmptyResponse.is_transport());
        assert!(!LlmError::InvalidShape.is_transport());
    }

    // -----------------------------------------------------------------------
    // GatewayClient
    // -----------------------------------------------------------------------

    #[test]
    fn from_config_builds_without_panic() {
        let _client = GatewayClient::from_config(&make_config());
    }

    /// Verify that `GatewayClient` is object-safe (usable as `dyn ChatClient`).
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn ChatClient> = Box::new(GatewayClient::from_config(&make_config()));
        drop(client);
    }

    #[tokio::test]
    async fn unreachable_backend_surfaces_transport_error() {
        // Nothing listens on this port; all attempts fail at connect time.
        let config = LlmConfig {
            base_url: "http://127.0.0.1:9".into(),
            max_retries: 2,
            retry_delay_secs: 0,
            timeout_secs: 2,
            ..LlmConfig::default()
        };
        let client = GatewayClient::from_config(&config);

        let result = client
            .complete(&[ChatMessage::user("hello")], 0.7, 16)
            .await;

        match result {
            Err(e) => assert!(e.is_transport(), "expected transport error, got {e}"),
            Ok(text) => panic!("expected failure, got {text:?}"),
        }
    }
}
