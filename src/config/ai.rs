//! Reasoning-oracle (LLM) configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the intent-classification oracle.
///
/// The classifier speaks the OpenAI-compatible chat completion protocol;
/// the defaults target DeepSeek.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// API key for the oracle endpoint
    pub api_key: Secret<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat completion API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature; classification wants determinism
    #[serde(default)]
    pub temperature: f32,
}

impl AiConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate oracle configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        use secrecy::ExposeSecret;

        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidOracleUrl);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }
        Ok(())
    }
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_timeout() -> u64 {
    60
}
