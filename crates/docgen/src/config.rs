//! Provider configuration.
//!
//! Read once at startup and handed to the backend clients. Request handling
//! never looks at the environment.

use std::env;

/// Default Groq model (fast, supports strict JSON schema output).
pub const DEFAULT_GROQ_MODEL: &str = "openai/gpt-oss-20b";
/// Default Groq chat completions endpoint.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default OpenRouter model.
pub const DEFAULT_OPENROUTER_MODEL: &str = "alibaba/tongyi-deepresearch-30b-a3b:free";
/// Default OpenRouter chat completions endpoint.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Default `HTTP-Referer` sent to OpenRouter.
pub const DEFAULT_OPENROUTER_SITE_URL: &str = "http://localhost:3000";
/// Default `X-Title` sent to OpenRouter.
pub const DEFAULT_OPENROUTER_SITE_NAME: &str = "Generative-AI-Services";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";
/// Default Gemini REST API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings shared by every backend.
#[derive(Clone, Default)]
pub struct BackendSettings {
    /// API key; `None` when the variable is unset or empty.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Endpoint URL (full chat completions URL, or API root for Gemini).
    pub base_url: String,
}

impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// OpenRouter settings, including the attribution headers.
#[derive(Debug, Clone, Default)]
pub struct OpenRouterSettings {
    /// Key, model and endpoint.
    pub backend: BackendSettings,
    /// Sent as `HTTP-Referer`.
    pub site_url: String,
    /// Sent as `X-Title`.
    pub site_name: String,
}

/// Process-wide configuration for all providers.
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    /// Groq settings.
    pub groq: BackendSettings,
    /// OpenRouter settings.
    pub openrouter: OpenRouterSettings,
    /// Gemini settings.
    pub gemini: BackendSettings,
}

impl AiConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Self {
            groq: BackendSettings {
                api_key: get("GROQ_API_KEY"),
                model: get_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
                base_url: get_or("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
            },
            openrouter: OpenRouterSettings {
                backend: BackendSettings {
                    api_key: get("OPENROUTER_API_KEY"),
                    model: get_or("OPENROUTER_MODEL", DEFAULT_OPENROUTER_MODEL),
                    base_url: get_or("OPENROUTER_BASE_URL", DEFAULT_OPENROUTER_BASE_URL),
                },
                site_url: get_or("OPENROUTER_SITE_URL", DEFAULT_OPENROUTER_SITE_URL),
                site_name: get_or("OPENROUTER_SITE_NAME", DEFAULT_OPENROUTER_SITE_NAME),
            },
            gemini: BackendSettings {
                api_key: get("GEMINI_API_KEY"),
                model: get_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                base_url: get_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AiConfig::from_lookup(lookup(&[]));
        assert!(config.groq.api_key.is_none());
        assert_eq!(config.groq.model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.openrouter.site_name, DEFAULT_OPENROUTER_SITE_NAME);
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_empty_key_is_unset() {
        let config = AiConfig::from_lookup(lookup(&[("GROQ_API_KEY", "  ")]));
        assert!(config.groq.api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AiConfig::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "or-key"),
            ("OPENROUTER_MODEL", "some/model"),
            ("GEMINI_BASE_URL", "http://localhost:9999"),
        ]));
        assert_eq!(config.openrouter.backend.api_key.as_deref(), Some("or-key"));
        assert_eq!(config.openrouter.backend.model, "some/model");
        assert_eq!(config.gemini.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig::from_lookup(lookup(&[("GROQ_API_KEY", "secret-value")]));
        let debug = format!("{:?}", config.groq);
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("[REDACTED]"));
    }
}
