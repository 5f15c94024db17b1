//! Extraction backend trait and concrete implementations.
//!
//! Backends:
//!   OpenAiBackend — OpenAI chat completions API (gpt-4o, gpt-4o-mini, …)
//!   GeminiBackend — Google Gemini generateContent API (gemini-2.5-flash, …)
//!
//! Both take a fully rendered extraction prompt and return the raw model
//! output; parsing and fallback routing are handled by the caller.

use async_trait::async_trait;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Empty completion from model")]
    EmptyCompletion,
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Capability contract for extraction providers. The router depends only on
/// this trait, never on a specific backend identity.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Send one rendered prompt and return the raw model output.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Stable backend name used for result attribution ("openai", "gemini").
    fn name(&self) -> &str;

    fn model_id(&self) -> &str;
}

// ── Helpers ──────────────────────────────────────────────────────────────────

async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status().as_u16();
    let body: serde_json::Value = resp.json().await?;
    if status >= 400 {
        let msg = body["error"]["message"]
            .as_str()
            .or_else(|| body["message"].as_str())
            .unwrap_or("unknown API error")
            .to_string();
        return Err(LlmError::ApiError { status, message: msg });
    }
    Ok(body)
}

fn non_empty(content: String) -> Result<String, LlmError> {
    if content.trim().is_empty() {
        Err(LlmError::EmptyCompletion)
    } else {
        Ok(content)
    }
}

// ── 1. OpenAI ─────────────────────────────────────────────────────────────────

pub struct OpenAiBackend {
    pub model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.1,
            max_tokens: 4096,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl ExtractionBackend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model":       &self.model,
            "messages":    [{"role": "user", "content": prompt}],
            "max_tokens":  self.max_tokens,
            "temperature": self.temperature,
        });
        let resp = self.client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let json = check_response_status(resp).await?;
        non_empty(
            json["choices"][0]["message"]["content"]
                .as_str()
                .unwrap_or("")
                .to_string(),
        )
    }

    fn name(&self) -> &str { "openai" }
    fn model_id(&self) -> &str { &self.model }
}

// ── 2. Google Gemini ──────────────────────────────────────────────────────────

pub struct GeminiBackend {
    pub model: String,
    api_key: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.1,
            // Long JSON responses get truncated at 4096 on flash models.
            max_tokens: 8192,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl ExtractionBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature":     self.temperature,
            }
        });

        let resp = self.client.post(&url).json(&body).send().await?;
        let json = check_response_status(resp).await?;

        non_empty(
            json["candidates"][0]["content"]["parts"][0]["text"]
                .as_str()
                .unwrap_or("")
                .to_string(),
        )
    }

    fn name(&self) -> &str { "gemini" }
    fn model_id(&self) -> &str { &self.model }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
