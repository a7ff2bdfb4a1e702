//! Text-generation providers.
//!
//! Concrete implementations of [`TextGenerator`]:
//! - **[`DisabledGenerator`]**: every call reports `UpstreamUnavailable`.
//! - **[`TemplateGenerator`]**: local keyword templates, no rewrites (from `onpage-core`).
//! - **[`OpenAIGenerator`]**: OpenAI-compatible `POST /chat/completions` with JSON output.
//! - **[`OllamaGenerator`]**: local Ollama `POST /api/chat` with `format: "json"`.
//!
//! # Provider Selection
//!
//! ```rust
//! # use onpage::config::GenerationConfig;
//! # use onpage::generation::create_generator;
//! # use onpage_core::KeywordTemplates;
//! let config = GenerationConfig::default(); // provider = "template"
//! let generator = create_generator(&config, &KeywordTemplates::default()).unwrap();
//! assert_eq!(generator.name(), "template");
//! ```
//!
//! # Retry Strategy
//!
//! Both HTTP providers use exponential backoff:
//! - HTTP 429 and 5xx → retry
//! - other HTTP 4xx → fail immediately
//! - network errors and timeouts → retry
//! - backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! Exhausted retries surface as `UpstreamUnavailable`; a reply that arrives
//! but does not fit the contract is `MalformedUpstreamResponse` and is not
//! retried.

pub mod prompt;

use anyhow::{bail, Result};
use async_trait::async_trait;
use onpage_core::{
    ContentSnapshot, FocusKeyword, KeywordCandidate, KeywordTemplates, RewriteSuggestions,
    SeoError, TemplateGenerator, TextGenerator,
};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::GenerationConfig;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Build the generator named by `config.provider`.
///
/// # Errors
///
/// Unknown provider, missing `model` for a remote provider, or (for
/// `openai`) `OPENAI_API_KEY` not set.
pub fn create_generator(
    config: &GenerationConfig,
    templates: &KeywordTemplates,
) -> Result<Box<dyn TextGenerator>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledGenerator)),
        "template" => Ok(Box::new(TemplateGenerator::new(templates.clone()))),
        "openai" => Ok(Box::new(OpenAIGenerator::new(config)?)),
        "ollama" => Ok(Box::new(OllamaGenerator::new(config)?)),
        other => bail!("Unknown generation provider: {}", other),
    }
}

// ============ Disabled Generator ============

/// A generator that refuses every request.
///
/// Used when `generation.provider = "disabled"`. Keyword suggestions still
/// work through the engine's template fallback.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn keyword_candidates(
        &self,
        _snapshot: &ContentSnapshot,
    ) -> Result<Vec<KeywordCandidate>, SeoError> {
        Err(SeoError::unavailable("Text generation provider is disabled"))
    }

    async fn rewrite(
        &self,
        _snapshot: &ContentSnapshot,
        _keyword: &FocusKeyword,
    ) -> Result<RewriteSuggestions, SeoError> {
        Err(SeoError::unavailable("Text generation provider is disabled"))
    }
}

// ============ OpenAI Generator ============

/// Generator using an OpenAI-compatible chat completions API.
///
/// Requires the `OPENAI_API_KEY` environment variable. `generation.url`
/// overrides the base URL for compatible gateways.
pub struct OpenAIGenerator {
    model: String,
    base_url: String,
    api_key: String,
    temperature: f32,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenAIGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;
        Self::with_api_key(config, api_key)
    }

    /// Construct with an explicit key instead of reading the environment.
    pub fn with_api_key(config: &GenerationConfig, api_key: impl Into<String>) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("generation.model required for OpenAI provider"))?;
        let base_url = config
            .url
            .clone()
            .unwrap_or_else(|| OPENAI_API_URL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            temperature: config.temperature,
            max_retries: config.max_retries,
            client,
        })
    }

    async fn complete(&self, user_prompt: String) -> Result<String, SeoError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": prompt::SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt },
            ],
        });

        debug!(model = %self.model, "OpenAI chat request");

        let json = post_json_with_retry("OpenAI", self.max_retries, || {
            self.client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
        })
        .await?;

        parse_openai_content(&json)
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn keyword_candidates(
        &self,
        snapshot: &ContentSnapshot,
    ) -> Result<Vec<KeywordCandidate>, SeoError> {
        let content = self.complete(prompt::keyword_prompt(snapshot)).await?;
        prompt::parse_candidates(&content)
    }

    async fn rewrite(
        &self,
        snapshot: &ContentSnapshot,
        keyword: &FocusKeyword,
    ) -> Result<RewriteSuggestions, SeoError> {
        let content = self.complete(prompt::rewrite_prompt(snapshot, keyword)).await?;
        prompt::parse_rewrite(&content)
    }
}

/// Extract `choices[0].message.content` from a chat completion.
fn parse_openai_content(json: &Value) -> Result<String, SeoError> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| SeoError::malformed("OpenAI response: missing choices[0].message.content"))
}

// ============ Ollama Generator ============

/// Generator using a local Ollama instance.
///
/// Calls `POST /api/chat` on the configured URL (default
/// `http://localhost:11434`) with a pulled chat model.
pub struct OllamaGenerator {
    model: String,
    url: String,
    temperature: f32,
    max_retries: u32,
    client: reqwest::Client,
}

impl OllamaGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("generation.model required for Ollama provider"))?;
        let url = config.url.clone().unwrap_or_else(|| OLLAMA_URL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            model,
            url: url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            max_retries: config.max_retries,
            client,
        })
    }

    async fn complete(&self, user_prompt: String) -> Result<String, SeoError> {
        let url = format!("{}/api/chat", self.url);
        let body = serde_json::json!({
            "model": self.model,
            "stream": false,
            "format": "json",
            "options": { "temperature": self.temperature },
            "messages": [
                { "role": "system", "content": prompt::SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt },
            ],
        });

        debug!(model = %self.model, url = %self.url, "Ollama chat request");

        let json = post_json_with_retry("Ollama", self.max_retries, || {
            self.client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&body)
        })
        .await?;

        json.get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| SeoError::malformed("Ollama response: missing message.content"))
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn keyword_candidates(
        &self,
        snapshot: &ContentSnapshot,
    ) -> Result<Vec<KeywordCandidate>, SeoError> {
        let content = self.complete(prompt::keyword_prompt(snapshot)).await?;
        prompt::parse_candidates(&content)
    }

    async fn rewrite(
        &self,
        snapshot: &ContentSnapshot,
        keyword: &FocusKeyword,
    ) -> Result<RewriteSuggestions, SeoError> {
        let content = self.complete(prompt::rewrite_prompt(snapshot, keyword)).await?;
        prompt::parse_rewrite(&content)
    }
}

// ============ Shared HTTP ============

/// Backoff before retry `attempt` (1-based): 1s, 2s, 4s, … capped at 32s.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.saturating_sub(1).min(5))
}

/// POST a JSON request, retrying transient failures, and return the parsed
/// JSON body of the first successful response.
async fn post_json_with_retry<F>(label: &str, max_retries: u32, build: F) -> Result<Value, SeoError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff_delay(attempt);
            debug!(attempt, delay_secs = delay.as_secs(), "{} retry", label);
            tokio::time::sleep(delay).await;
        }

        match build().send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return response.json::<Value>().await.map_err(|e| {
                        SeoError::malformed(format!("{} response is not JSON: {}", label, e))
                    });
                }

                let body_text = response.text().await.unwrap_or_default();

                // Rate limited or server error, retry
                if status.as_u16() == 429 || status.is_server_error() {
                    last_err = Some(SeoError::unavailable(format!(
                        "{} API error {}: {}",
                        label, status, body_text
                    )));
                    continue;
                }

                // Client error (not 429), fail now
                return Err(SeoError::unavailable(format!(
                    "{} API error {}: {}",
                    label, status, body_text
                )));
            }
            Err(e) => {
                last_err = Some(SeoError::unavailable(format!(
                    "{} request failed: {}",
                    label, e
                )));
                continue;
            }
        }
    }

    Err(last_err
        .unwrap_or_else(|| SeoError::unavailable(format!("{} failed after retries", label))))
}
