//! Groq provider implementation.
//!
//! Groq is the fastest backend and the only one with strict JSON schema
//! output, which makes it the default for every task.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::BackendSettings;
use crate::errors::GenResult;

use super::chat::{ChatCompletionsClient, ResponseFormat};
use super::provider::{BackendClient, Capabilities, Provider};

/// Groq chat completions client.
#[derive(Debug, Clone)]
pub struct GroqClient {
    chat: ChatCompletionsClient,
}

impl GroqClient {
    /// Create a client from settings.
    ///
    /// Fails with a configuration error when `GROQ_API_KEY` is absent.
    pub fn new(settings: &BackendSettings) -> GenResult<Self> {
        Ok(Self {
            chat: ChatCompletionsClient::new(Provider::Groq, settings, &[])?,
        })
    }
}

#[async_trait]
impl BackendClient for GroqClient {
    fn provider(&self) -> Provider {
        Provider::Groq
    }

    fn model_name(&self) -> String {
        self.chat.model().to_string()
    }

    fn capabilities(&self) -> Capabilities {
        Provider::Groq.capabilities()
    }

    async fn generate_plain(&self, prompt: &str) -> GenResult<String> {
        self.chat.complete(prompt, None).await
    }

    async fn generate_json_mode(&self, prompt: &str) -> GenResult<String> {
        self.chat
            .complete(prompt, Some(ResponseFormat::JsonObject))
            .await
    }

    async fn generate_schema_constrained(&self, prompt: &str, schema: &Value) -> GenResult<String> {
        self.chat
            .complete(prompt, Some(ResponseFormat::strict_schema(schema)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_client_identity() {
        let settings = BackendSettings {
            api_key: Some("gsk-test".to_string()),
            model: "openai/gpt-oss-20b".to_string(),
            base_url: "http://localhost/v1/chat/completions".to_string(),
        };
        let client = GroqClient::new(&settings).unwrap();
        assert_eq!(client.provider(), Provider::Groq);
        assert_eq!(client.model_name(), "openai/gpt-oss-20b");
        assert!(client.capabilities().schema_enforced);
    }
}
