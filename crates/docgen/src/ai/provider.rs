//! Backend client trait and common types.
//!
//! Defines the interface that every text-generation backend implements.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{GenResult, GenerationError};

/// A third-party text-generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Groq (OpenAI-compatible, strict JSON schema output)
    Groq,
    /// OpenRouter (OpenAI-compatible, JSON mode)
    #[serde(rename = "openrouter")]
    OpenRouter,
    /// Google Gemini (plain text)
    Gemini,
}

impl Provider {
    /// Every provider, in default-preference order.
    pub const ALL: [Provider; 3] = [Provider::Groq, Provider::OpenRouter, Provider::Gemini];

    /// Identifier used on the wire and in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenRouter => "openrouter",
            Self::Gemini => "gemini",
        }
    }

    /// What the backend can guarantee about reply structure.
    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Groq => Capabilities::PLAIN_TEXT.with_json_mode().with_schema_enforced(),
            Self::OpenRouter => Capabilities::PLAIN_TEXT.with_json_mode(),
            Self::Gemini => Capabilities::PLAIN_TEXT,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = GenerationError;

    /// Parse a provider name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                GenerationError::validation(format!(
                    "Unknown provider '{}'. Known providers: {}",
                    s.trim(),
                    known.join(", ")
                ))
            })
    }
}

/// Output guarantees a backend offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    /// Unstructured text replies.
    pub plain_text: bool,
    /// Replies guaranteed to be syntactically valid JSON.
    pub json_mode: bool,
    /// Replies guaranteed to conform to a supplied JSON schema.
    pub schema_enforced: bool,
}

impl Capabilities {
    /// Plain text only.
    pub const PLAIN_TEXT: Capabilities = Capabilities {
        plain_text: true,
        json_mode: false,
        schema_enforced: false,
    };

    /// Add JSON mode.
    pub const fn with_json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    /// Add schema enforcement.
    pub const fn with_schema_enforced(mut self) -> Self {
        self.schema_enforced = true;
        self
    }
}

/// A client for one text-generation backend.
///
/// Each implementation owns its transport (endpoint, credentials, model),
/// resolved once at construction. Calls are never retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Which provider this client talks to.
    fn provider(&self) -> Provider;

    /// Model identifier sent with every call.
    fn model_name(&self) -> String;

    /// Output guarantees this client supports.
    fn capabilities(&self) -> Capabilities;

    /// Generate unstructured text. Markdown code fences are stripped.
    async fn generate_plain(&self, prompt: &str) -> GenResult<String>;

    /// Generate text the backend guarantees is valid JSON.
    async fn generate_json_mode(&self, prompt: &str) -> GenResult<String> {
        let _ = prompt;
        Err(GenerationError::validation(format!(
            "{} does not support JSON mode",
            self.provider()
        )))
    }

    /// Generate JSON the backend guarantees conforms to `schema`.
    async fn generate_schema_constrained(&self, prompt: &str, schema: &Value) -> GenResult<String> {
        let _ = (prompt, schema);
        Err(GenerationError::validation(format!(
            "{} does not support schema-enforced output",
            self.provider()
        )))
    }
}

/// Strip markdown code fences wrapping a reply.
///
/// Removes any leading fence (optionally tagged `json`) and any trailing
/// fence, together with the whitespace around them. Text without a fence at
/// either end is returned unchanged.
pub fn strip_code_fences(text: &str) -> String {
    let mut stripped = text.trim();
    let mut changed = false;

    loop {
        let before = stripped.len();
        if let Some(rest) = stripped.strip_prefix("```") {
            stripped = rest.strip_prefix("json").unwrap_or(rest).trim_start();
        }
        if let Some(rest) = stripped.strip_suffix("```") {
            stripped = rest.trim_end();
        }
        if stripped.len() == before {
            break;
        }
        changed = true;
    }

    if changed {
        stripped.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_case_insensitive() {
        assert_eq!("GROQ".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!(" OpenRouter ".parse::<Provider>().unwrap(), Provider::OpenRouter);
        assert_eq!("gemini".parse::<Provider>().unwrap(), Provider::Gemini);
    }

    #[test]
    fn test_provider_parse_unknown() {
        let err = "claude".parse::<Provider>().unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("groq, openrouter, gemini"));
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(serde_json::to_string(&Provider::OpenRouter).unwrap(), "\"openrouter\"");
        let parsed: Provider = serde_json::from_str("\"groq\"").unwrap();
        assert_eq!(parsed, Provider::Groq);
    }

    #[test]
    fn test_provider_capabilities() {
        assert!(Provider::Groq.capabilities().schema_enforced);
        assert!(Provider::OpenRouter.capabilities().json_mode);
        assert!(!Provider::OpenRouter.capabilities().schema_enforced);
        assert_eq!(Provider::Gemini.capabilities(), Capabilities::PLAIN_TEXT);
    }

    #[test]
    fn test_strip_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json   \n\n  {}  \n\n   ```  "), "{}");
    }

    #[test]
    fn test_strip_single_sided_fence() {
        assert_eq!(strip_code_fences("```json\n{}"), "{}");
        assert_eq!(strip_code_fences("{}\n```"), "{}");
    }

    #[test]
    fn test_strip_without_fence_is_identity() {
        for text in ["plain text", "  padded  ", "", "inner ``` fence stays", "{\"a\": \"```\"}"] {
            assert_eq!(strip_code_fences(text), text);
        }
    }

    #[test]
    fn test_strip_is_idempotent() {
        let samples = [
            "```json\n{\"a\": 1}\n```",
            "```json\n```json\n{}\n```\n```",
            "``````",
            "```",
            "  ```\n  text\n```  ",
            "no fences here",
            "```python\nprint(1)\n```",
        ];
        for sample in samples {
            let once = strip_code_fences(sample);
            assert_eq!(strip_code_fences(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[tokio::test]
    async fn test_default_strategy_methods_reject() {
        struct PlainOnly;

        #[async_trait]
        impl BackendClient for PlainOnly {
            fn provider(&self) -> Provider {
                Provider::Gemini
            }
            fn model_name(&self) -> String {
                "plain".to_string()
            }
            fn capabilities(&self) -> Capabilities {
                Capabilities::PLAIN_TEXT
            }
            async fn generate_plain(&self, prompt: &str) -> GenResult<String> {
                Ok(prompt.to_string())
            }
        }

        let client = PlainOnly;
        assert!(client.generate_json_mode("x").await.unwrap_err().is_client_error());
        assert!(client
            .generate_schema_constrained("x", &serde_json::json!({}))
            .await
            .unwrap_err()
            .is_client_error());
    }
}
