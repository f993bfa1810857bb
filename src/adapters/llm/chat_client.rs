//! Minimal OpenAI-compatible chat completion client.
//!
//! The reasoning oracle (DeepSeek by default) speaks the standard
//! `/chat/completions` protocol. The client is deliberately small: one
//! system + one user message in, the first choice's content out.

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;

use crate::config::AiConfig;
use crate::ports::ClassificationError;

/// HTTP client for the oracle endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    api_key: Secret<String>,
    model: String,
    base_url: String,
    temperature: f32,
    timeout_secs: u64,
}

impl ChatClient {
    /// Builds a client from the oracle configuration.
    pub fn new(config: &AiConfig) -> Result<Self, ClassificationError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClassificationError::Request(format!("failed to build client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Sends one system + user exchange and returns the reply text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ClassificationError> {
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassificationError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    ClassificationError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationError::Request(format!(
                "oracle returned {}",
                status
            )));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::MalformedResponse(e.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                ClassificationError::MalformedResponse("reply contained no choices".to_string())
            })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_response_deserializes() {
        let json = r#"{
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "hello" } }
            ],
            "usage": { "total_tokens": 12 }
        }"#;

        let payload: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.choices[0].message.content, "hello");
    }
}
