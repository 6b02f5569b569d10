//! Backend registry.
//!
//! Maps each [`Provider`] to its client. Built once at startup and shared
//! read-only across requests.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::AiConfig;
use crate::errors::{GenResult, GenerationError};
use crate::task::TaskKind;

use super::gemini::GeminiClient;
use super::groq::GroqClient;
use super::openrouter::OpenRouterClient;
use super::provider::{BackendClient, Provider};

/// A registry slot: a ready client, or the reason it could not be built.
enum Slot {
    Ready(Arc<dyn BackendClient>),
    Unconfigured(String),
}

/// Registry of backend clients, one per provider.
pub struct BackendRegistry {
    slots: HashMap<Provider, Slot>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn builder() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Build every client from configuration.
    ///
    /// Providers whose client cannot be built are kept as unconfigured and
    /// report the construction error when selected.
    pub fn from_config(config: &AiConfig) -> Self {
        let mut registry = Self::builder();

        registry.insert_built(Provider::Groq, GroqClient::new(&config.groq));
        registry.insert_built(Provider::OpenRouter, OpenRouterClient::new(&config.openrouter));
        registry.insert_built(Provider::Gemini, GeminiClient::new(&config.gemini));

        info!(
            configured = ?registry.configured_providers(),
            "Backend registry initialized"
        );
        registry
    }

    fn insert_built<C>(&mut self, provider: Provider, built: GenResult<C>)
    where
        C: BackendClient + 'static,
    {
        match built {
            Ok(client) => {
                self.slots.insert(provider, Slot::Ready(Arc::new(client)));
            }
            Err(GenerationError::Config { reason, .. }) => {
                warn!(%provider, %reason, "Provider not configured");
                self.slots.insert(provider, Slot::Unconfigured(reason));
            }
            Err(other) => {
                warn!(%provider, error = %other, "Provider not configured");
                self.slots.insert(provider, Slot::Unconfigured(other.to_string()));
            }
        }
    }

    /// Register a client under its own provider, replacing any slot.
    #[must_use]
    pub fn register(mut self, client: Arc<dyn BackendClient>) -> Self {
        self.slots.insert(client.provider(), Slot::Ready(client));
        self
    }

    /// Get the client for `provider`.
    ///
    /// Returns the recorded configuration error when the client could not
    /// be built, or when no client was ever registered.
    pub fn client(&self, provider: Provider) -> GenResult<Arc<dyn BackendClient>> {
        match self.slots.get(&provider) {
            Some(Slot::Ready(client)) => Ok(Arc::clone(client)),
            Some(Slot::Unconfigured(reason)) => Err(GenerationError::Config {
                provider,
                reason: reason.clone(),
            }),
            None => Err(GenerationError::Config {
                provider,
                reason: "no client registered".to_string(),
            }),
        }
    }

    /// Whether a ready client exists for `provider`.
    pub fn is_configured(&self, provider: Provider) -> bool {
        matches!(self.slots.get(&provider), Some(Slot::Ready(_)))
    }

    /// Providers with a ready client, in default-preference order.
    pub fn configured_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.is_configured(*p))
            .collect()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("configured", &self.configured_providers())
            .finish_non_exhaustive()
    }
}

/// Human-readable speed and quality class of a provider for a task.
///
/// Used in error messages and discovery only, never for behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    /// Typical latency, e.g. `3-5s`.
    pub speed: &'static str,
    /// Output quality class.
    pub quality: &'static str,
}

impl ProviderInfo {
    const fn new(speed: &'static str, quality: &'static str) -> Self {
        Self { speed, quality }
    }

    /// Descriptor for `provider` when generating `kind`.
    pub fn for_task(kind: TaskKind, provider: Provider) -> Self {
        match (kind, provider) {
            (TaskKind::Prd, Provider::Groq) => Self::new("3-5s", "Excellent (Structured output)"),
            (TaskKind::Prd, Provider::OpenRouter) => Self::new("10-15s", "Good (JSON mode)"),
            (TaskKind::Prd, Provider::Gemini) => Self::new("25s+", "Poor (Manual parsing, errors)"),
            (TaskKind::ProjectDescription, Provider::Groq) => Self::new("2-3s", "Excellent"),
            (TaskKind::ProjectDescription, Provider::OpenRouter) => Self::new("8-10s", "Good"),
            (TaskKind::ProjectDescription, Provider::Gemini) => Self::new("15-20s", "Okay"),
            (
                TaskKind::TaskDescriptionSimple | TaskKind::TaskDescriptionDetailed,
                Provider::Groq,
            ) => Self::new("2-3s", "Excellent (Structured output)"),
            (
                TaskKind::TaskDescriptionSimple | TaskKind::TaskDescriptionDetailed,
                Provider::OpenRouter,
            ) => Self::new("8-10s", "Good (JSON mode)"),
            (
                TaskKind::TaskDescriptionSimple | TaskKind::TaskDescriptionDetailed,
                Provider::Gemini,
            ) => Self::new("15-20s", "Okay (Text parsing)"),
        }
    }
}

/// Message for a provider that is unknown or not allowed for `kind`.
///
/// Task descriptions list speed and quality; other kinds list speed only.
pub fn unsupported_provider_message(kind: TaskKind) -> String {
    let listed: Vec<String> = kind
        .supported_providers()
        .iter()
        .map(|provider| {
            let info = ProviderInfo::for_task(kind, *provider);
            match kind {
                TaskKind::TaskDescriptionSimple | TaskKind::TaskDescriptionDetailed => {
                    format!("{provider} ({}, {})", info.speed, info.quality)
                }
                TaskKind::Prd | TaskKind::ProjectDescription => {
                    format!("{provider} ({})", info.speed)
                }
            }
        })
        .collect();
    format!("Invalid provider. Supported providers: {}", listed.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::{Capabilities, MockBackendClient};
    use crate::config::AiConfig;

    fn mock(provider: Provider) -> Arc<dyn BackendClient> {
        let mut client = MockBackendClient::new();
        client.expect_provider().return_const(provider);
        client
            .expect_capabilities()
            .return_const(Capabilities::PLAIN_TEXT);
        Arc::new(client)
    }

    /// The error from looking up `provider`; clients are not `Debug`.
    fn lookup_error(registry: &BackendRegistry, provider: Provider) -> GenerationError {
        let Err(err) = registry.client(provider) else {
            panic!("expected {provider} lookup to fail");
        };
        err
    }

    #[test]
    fn test_unconfigured_providers_report_config_error() {
        let config = AiConfig::from_lookup(|key| match key {
            "GROQ_API_KEY" => Some("gsk-test".to_string()),
            _ => None,
        });
        let registry = BackendRegistry::from_config(&config);

        assert!(registry.client(Provider::Groq).is_ok());
        assert_eq!(registry.configured_providers(), [Provider::Groq]);

        let err = lookup_error(&registry, Provider::Gemini);
        assert!(matches!(err, GenerationError::Config { provider: Provider::Gemini, .. }));
        assert!(err.to_string().contains("GEMINI_API_KEY is not set"));

        let err = lookup_error(&registry, Provider::OpenRouter);
        assert!(err.to_string().contains("OPENROUTER_API_KEY is not set"));
    }

    #[test]
    fn test_client_identity_is_stable() {
        let registry = BackendRegistry::builder().register(mock(Provider::Gemini));
        let first = registry.client(Provider::Gemini).unwrap();
        let second = registry.client(Provider::Gemini).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_empty_builder_has_no_clients() {
        let registry = BackendRegistry::builder();
        assert!(registry.configured_providers().is_empty());
        let err = lookup_error(&registry, Provider::Groq);
        assert!(matches!(err, GenerationError::Config { provider: Provider::Groq, .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_unsupported_message_prd() {
        assert_eq!(
            unsupported_provider_message(TaskKind::Prd),
            "Invalid provider. Supported providers: groq (3-5s), openrouter (10-15s)"
        );
    }

    #[test]
    fn test_unsupported_message_project() {
        assert_eq!(
            unsupported_provider_message(TaskKind::ProjectDescription),
            "Invalid provider. Supported providers: groq (2-3s), openrouter (8-10s), gemini (15-20s)"
        );
    }

    #[test]
    fn test_unsupported_message_task_lists_quality() {
        assert_eq!(
            unsupported_provider_message(TaskKind::TaskDescriptionDetailed),
            "Invalid provider. Supported providers: groq (2-3s, Excellent (Structured output)), \
             openrouter (8-10s, Good (JSON mode)), gemini (15-20s, Okay (Text parsing))"
        );
    }

    #[test]
    fn test_gemini_prd_descriptor() {
        let info = ProviderInfo::for_task(TaskKind::Prd, Provider::Gemini);
        assert_eq!(info.speed, "25s+");
    }
}
