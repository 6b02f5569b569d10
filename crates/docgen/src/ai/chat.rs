//! OpenAI-compatible chat completions transport.
//!
//! Groq and OpenRouter both speak this protocol; they differ only in
//! endpoint, headers and the response formats they accept.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::BackendSettings;
use crate::errors::{GenResult, GenerationError};

use super::provider::{strip_code_fences, Provider};

/// Chat API request message.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Requested reply format.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ResponseFormat<'a> {
    /// Any syntactically valid JSON object.
    JsonObject,
    /// JSON conforming to the given schema.
    JsonSchema { json_schema: JsonSchemaFormat<'a> },
}

impl<'a> ResponseFormat<'a> {
    /// Strict schema format under the name `response`.
    pub(crate) fn strict_schema(schema: &'a Value) -> Self {
        Self::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: "response",
                schema,
                strict: true,
            },
        }
    }
}

/// Schema payload for `json_schema` replies.
#[derive(Debug, Serialize)]
pub(crate) struct JsonSchemaFormat<'a> {
    name: &'static str,
    schema: &'a Value,
    strict: bool,
}

/// Chat API request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

/// Chat API response message.
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat API response choice.
#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

/// Chat API response.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

/// Chat API error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat API error response.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

/// HTTP transport for one OpenAI-compatible backend.
#[derive(Clone)]
pub(crate) struct ChatCompletionsClient {
    client: Client,
    provider: Provider,
    model: String,
    url: String,
}

impl ChatCompletionsClient {
    /// Build a client from settings, adding `extra_headers` to every call.
    ///
    /// Fails when the API key is missing or cannot be sent as a header.
    pub(crate) fn new(
        provider: Provider,
        settings: &BackendSettings,
        extra_headers: &[(&'static str, &str)],
    ) -> GenResult<Self> {
        let config_error = |reason: String| GenerationError::Config { provider, reason };

        let api_key = settings.api_key.as_deref().ok_or_else(|| {
            config_error(format!(
                "{}_API_KEY is not set",
                provider.as_str().to_ascii_uppercase()
            ))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| config_error(format!("invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        for &(name, value) in extra_headers {
            let value = HeaderValue::from_str(value)
                .map_err(|e| config_error(format!("invalid {name} header: {e}")))?;
            headers.insert(HeaderName::from_static(name), value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| config_error(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            provider,
            model: settings.model.clone(),
            url: settings.base_url.clone(),
        })
    }

    /// Model identifier sent with every call.
    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    /// Send a single-turn user prompt and return the reply text.
    #[instrument(skip_all, fields(provider = %self.provider, model = %self.model))]
    pub(crate) async fn complete(
        &self,
        prompt: &str,
        response_format: Option<ResponseFormat<'_>>,
    ) -> GenResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format,
        };

        debug!(url = %self.url, "Sending chat completion request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                GenerationError::Transport {
                    provider: self.provider,
                    status: None,
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GenerationError::Transport {
            provider: self.provider,
            status: Some(status.as_u16()),
            message: format!("failed to read response: {e}"),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Chat completion returned an error status");
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Transport {
                provider: self.provider,
                status: Some(status.as_u16()),
                message: format!(
                    "{} - {detail}",
                    status.canonical_reason().unwrap_or("Unknown status")
                ),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::decode(self.provider, format!("failed to parse response: {e}"))
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::decode(self.provider, format!("No response from {} API", self.provider))
            })?;

        Ok(strip_code_fences(&text))
    }
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_format_serialization() {
        let schema = json!({"type": "object"});
        let strict = serde_json::to_value(ResponseFormat::strict_schema(&schema)).unwrap();
        assert_eq!(
            strict,
            json!({
                "type": "json_schema",
                "json_schema": {"name": "response", "schema": {"type": "object"}, "strict": true}
            })
        );

        let json_mode = serde_json::to_value(ResponseFormat::JsonObject).unwrap();
        assert_eq!(json_mode, json!({"type": "json_object"}));
    }

    #[test]
    fn test_plain_request_omits_response_format() {
        let request = ChatRequest {
            model: "m",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            response_format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let settings = BackendSettings {
            api_key: None,
            model: "m".to_string(),
            base_url: "http://localhost".to_string(),
        };
        let err = ChatCompletionsClient::new(Provider::Groq, &settings, &[]).unwrap_err();
        assert!(matches!(err, GenerationError::Config { provider: Provider::Groq, .. }));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
