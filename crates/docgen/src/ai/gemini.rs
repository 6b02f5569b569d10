//! Google Gemini provider implementation.
//!
//! Uses the `generateContent` REST endpoint. Gemini is treated as a
//! plain-text backend: structure is requested through the prompt only.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::BackendSettings;
use crate::errors::{GenResult, GenerationError};

use super::provider::{strip_code_fences, BackendClient, Capabilities, Provider};

/// Gemini request part
#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Gemini request content
#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

/// Gemini `generateContent` request
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

/// Gemini `generateContent` response
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        Some(text)
    }
}

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    model: String,
    url: String,
}

impl GeminiClient {
    /// Create a client from settings.
    ///
    /// Fails with a configuration error when `GEMINI_API_KEY` is absent.
    pub fn new(settings: &BackendSettings) -> GenResult<Self> {
        let config_error = |reason: String| GenerationError::Config {
            provider: Provider::Gemini,
            reason,
        };

        let api_key = settings
            .api_key
            .as_deref()
            .ok_or_else(|| config_error("GEMINI_API_KEY is not set".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| config_error(format!("invalid API key: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| config_error(format!("failed to build HTTP client: {e}")))?;

        let url = format!(
            "{}/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            settings.model
        );

        Ok(Self {
            client,
            model: settings.model.clone(),
            url,
        })
    }
}

#[async_trait]
impl BackendClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }

    fn capabilities(&self) -> Capabilities {
        Provider::Gemini.capabilities()
    }

    #[instrument(skip_all, fields(provider = "gemini", model = %self.model))]
    async fn generate_plain(&self, prompt: &str) -> GenResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(url = %self.url, "Sending generateContent request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                GenerationError::Transport {
                    provider: Provider::Gemini,
                    status: None,
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GenerationError::Transport {
            provider: Provider::Gemini,
            status: Some(status.as_u16()),
            message: format!("failed to read response: {e}"),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini returned an error status");
            let detail = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Transport {
                provider: Provider::Gemini,
                status: Some(status.as_u16()),
                message: format!(
                    "{} - {detail}",
                    status.canonical_reason().unwrap_or("Unknown status")
                ),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::decode(Provider::Gemini, format!("failed to parse response: {e}"))
        })?;

        let text = parsed
            .text()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GenerationError::decode(Provider::Gemini, "No response from Gemini API"))?;

        Ok(strip_code_fences(&text))
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
