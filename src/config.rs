use anyhow::{Context, Result};
use onpage_core::KeywordTemplates;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub keywords: KeywordTemplates,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SiteConfig {
    /// Used when a snapshot file carries no `site_base_url` of its own.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    /// API base URL. OpenAI: `https://api.openai.com/v1`; Ollama: `http://localhost:11434`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "template".to_string(),
            model: None,
            url: None,
            max_retries: 3,
            timeout_secs: 30,
            temperature: 0.3,
        }
    }
}

fn default_provider() -> String {
    "template".to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_temperature() -> f32 {
    0.3
}

impl GenerationConfig {
    /// True for providers that call out over the network.
    pub fn is_remote(&self) -> bool {
        matches!(self.provider.as_str(), "openai" | "ollama")
    }
}

impl Config {
    /// Configuration used when no config file is present: template
    /// keyword generation, no rewrite provider, no default site URL.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using minimal config");
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    let generation = &config.generation;

    match generation.provider.as_str() {
        "disabled" | "template" | "openai" | "ollama" => {}
        other => anyhow::bail!(
            "Unknown generation provider: '{}'. Must be disabled, template, openai, or ollama.",
            other
        ),
    }

    if generation.is_remote() && generation.model.is_none() {
        anyhow::bail!(
            "generation.model must be specified when provider is '{}'",
            generation.provider
        );
    }

    if generation.timeout_secs == 0 {
        anyhow::bail!("generation.timeout_secs must be > 0");
    }

    if !(0.0..=2.0).contains(&generation.temperature) {
        anyhow::bail!("generation.temperature must be in [0.0, 2.0]");
    }

    if config.keywords.long_tail_suffix.trim().is_empty()
        || config.keywords.long_tail_prefix.trim().is_empty()
    {
        anyhow::bail!("keywords.long_tail_suffix and keywords.long_tail_prefix must not be empty");
    }

    Ok(())
}
