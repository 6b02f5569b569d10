//! OpenRouter provider implementation.

use async_trait::async_trait;

use crate::config::OpenRouterSettings;
use crate::errors::GenResult;

use super::chat::{ChatCompletionsClient, ResponseFormat};
use super::provider::{BackendClient, Capabilities, Provider};

/// OpenRouter chat completions client.
///
/// Sends the `HTTP-Referer` and `X-Title` attribution headers with every
/// call. Supports JSON mode but not schema enforcement.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    chat: ChatCompletionsClient,
}

impl OpenRouterClient {
    /// Create a client from settings.
    ///
    /// Fails with a configuration error when `OPENROUTER_API_KEY` is absent.
    pub fn new(settings: &OpenRouterSettings) -> GenResult<Self> {
        let headers = [
            ("http-referer", settings.site_url.as_str()),
            ("x-title", settings.site_name.as_str()),
        ];
        Ok(Self {
            chat: ChatCompletionsClient::new(Provider::OpenRouter, &settings.backend, &headers)?,
        })
    }
}

#[async_trait]
impl BackendClient for OpenRouterClient {
    fn provider(&self) -> Provider {
        Provider::OpenRouter
    }

    fn model_name(&self) -> String {
        self.chat.model().to_string()
    }

    fn capabilities(&self) -> Capabilities {
        Provider::OpenRouter.capabilities()
    }

    async fn generate_plain(&self, prompt: &str) -> GenResult<String> {
        self.chat.complete(prompt, None).await
    }

    async fn generate_json_mode(&self, prompt: &str) -> GenResult<String> {
        self.chat
            .complete(prompt, Some(ResponseFormat::JsonObject))
            .await
    }
}
