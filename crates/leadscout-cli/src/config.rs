//! Configuration loading for the leadscout binary.
//! Reads leadscout.toml from the current directory or the path in the
//! LEADSCOUT_CONFIG env var; API keys may come from the environment
//! (OPENAI_API_KEY / GOOGLE_API_KEY, or a .env file).

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Backend tried first; the other configured backend becomes the fallback.
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    pub openai: Option<ProviderConfig>,
    pub gemini: Option<ProviderConfig>,
}

fn default_primary() -> String { "openai".to_string() }
fn default_timeout_secs() -> u64 { 60 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            timeout_secs: default_timeout_secs(),
            openai: Some(ProviderConfig {
                model: "gpt-4o".to_string(),
                api_key: String::new(),
            }),
            gemini: Some(ProviderConfig {
                model: "gemini-2.5-flash".to_string(),
                api_key: String::new(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub model: String,
    /// Empty means "read from the environment".
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize { 4 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { concurrency: default_concurrency() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Optional YAML file overriding the built-in rule tables.
    pub tables: Option<String>,
}

impl Config {
    /// Load from an explicit path, $LEADSCOUT_CONFIG, or ./leadscout.toml.
    /// A missing file yields the defaults rather than an error.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(|p| p.to_path_buf())
            .or_else(|| std::env::var("LEADSCOUT_CONFIG").ok().map(Into::into))
            .unwrap_or_else(|| "leadscout.toml".into());

        if !path.exists() {
            if explicit.is_some() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            tracing::debug!("No leadscout.toml found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Resolve a provider's API key: config value first, then the environment.
pub fn resolve_api_key(configured: &str, env_vars: &[&str]) -> Option<String> {
    if !configured.is_empty() {
        return Some(configured.to_string());
    }
    env_vars
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|key| !key.is_empty())
}
