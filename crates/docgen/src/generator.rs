//! Generation orchestrator.
//!
//! Each request runs `validate → select strategy → call backend → normalize`
//! and stops at the first failure. Nothing falls back to another provider
//! or another strategy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::ai::{
    unsupported_provider_message, BackendRegistry, OutputStrategy, PromptManager, Provider,
};
use crate::documents::{
    PrdDocument, PrdResponse, ProjectDescriptionResponse, TaskDescription,
    TaskDescriptionDetailed, TaskDescriptionResponse,
};
use crate::errors::{GenResult, GenerationError};
use crate::normalize::{clean_project_description, clean_task_description, normalize_structured};
use crate::task::{
    present, ProductInput, ProjectDescriptionInput, ResponseType, TaskDescriptionInput, TaskKind,
};

/// Raw backend reply plus the model that produced it.
struct Completion {
    text: String,
    model: String,
}

/// Generates documents through the backend registry.
#[derive(Debug)]
pub struct Generator {
    registry: Arc<BackendRegistry>,
    prompts: PromptManager,
}

impl Generator {
    /// Create a generator over `registry` with the default prompt templates.
    pub fn new(registry: Arc<BackendRegistry>) -> Self {
        Self {
            registry,
            prompts: PromptManager::new(),
        }
    }

    /// The backend registry.
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Resolve the requested provider against the allow-list for `kind`.
    ///
    /// A missing or blank name selects the kind's default provider.
    pub fn resolve_provider(kind: TaskKind, requested: Option<&str>) -> GenResult<Provider> {
        let Some(name) = present(requested) else {
            return Ok(kind.default_provider());
        };

        match name.parse::<Provider>() {
            Ok(provider) if kind.supports(provider) => Ok(provider),
            _ => {
                warn!(task = %kind, provider = name, "Rejected unsupported provider");
                Err(GenerationError::validation(unsupported_provider_message(kind)))
            }
        }
    }

    /// Generate a product requirements document.
    pub async fn generate_prd(
        &self,
        input: &ProductInput,
        provider: Option<&str>,
    ) -> GenResult<PrdResponse> {
        let kind = TaskKind::Prd;
        let provider = Self::resolve_provider(kind, provider)?;
        let prompt = self.prompts.prd_prompt(input)?;

        let started = Instant::now();
        info!(task = %kind, %provider, "Generating document");

        let completion = self.complete(kind, provider, &prompt).await?;
        let data: PrdDocument = Self::parse_structured(kind, provider, &completion.text, &HashMap::new())?;

        info!(
            task = %kind,
            %provider,
            features = data.features.len(),
            elapsed_ms = elapsed_ms(started),
            "Document generated"
        );

        Ok(PrdResponse {
            provider,
            data,
            model: completion.model,
            timestamp: Utc::now(),
        })
    }

    /// Generate a single-paragraph project description.
    pub async fn generate_project_description(
        &self,
        input: &ProjectDescriptionInput,
        provider: Option<&str>,
    ) -> GenResult<ProjectDescriptionResponse> {
        let kind = TaskKind::ProjectDescription;
        let (prompt, mode) = self.prompts.project_description_prompt(input)?;
        let provider = Self::resolve_provider(kind, provider)?;

        let started = Instant::now();
        info!(task = %kind, %provider, ?mode, "Generating document");

        let completion = self.complete(kind, provider, &prompt).await?;
        let description = clean_project_description(&completion.text);

        info!(task = %kind, %provider, elapsed_ms = elapsed_ms(started), "Document generated");

        Ok(ProjectDescriptionResponse {
            description,
            provider,
            model: completion.model,
            generated_from: mode,
            timestamp: Utc::now(),
        })
    }

    /// Generate a narrative or structured task description.
    pub async fn generate_task_description(
        &self,
        response_type: ResponseType,
        input: &TaskDescriptionInput,
        provider: Option<&str>,
    ) -> GenResult<TaskDescriptionResponse> {
        let kind = response_type.task_kind();
        input.validate()?;
        let provider = Self::resolve_provider(kind, provider)?;
        let prompt = self.prompts.task_description_prompt(response_type, input)?;

        let started = Instant::now();
        info!(task = %kind, %provider, "Generating document");

        let completion = self.complete(kind, provider, &prompt).await?;

        let task_description = match response_type {
            ResponseType::Simple => TaskDescription::Simple(clean_task_description(&completion.text)),
            ResponseType::Detailed => {
                let mut defaults = HashMap::new();
                if let Some(effort) = present(input.estimated_effort.as_deref()) {
                    defaults.insert("estimatedEffort", effort.to_string());
                }
                if let Some(constraints) = present(input.constraints.as_deref()) {
                    defaults.insert("notes", constraints.to_string());
                }
                let detailed: TaskDescriptionDetailed =
                    Self::parse_structured(kind, provider, &completion.text, &defaults)?;
                TaskDescription::Detailed(detailed)
            }
        };

        info!(task = %kind, %provider, elapsed_ms = elapsed_ms(started), "Document generated");

        Ok(TaskDescriptionResponse {
            task_description,
            response_type,
            provider,
            model: completion.model,
            timestamp: Utc::now(),
        })
    }

    /// Select the strategy for `provider` and make the single backend call.
    async fn complete(&self, kind: TaskKind, provider: Provider, prompt: &str) -> GenResult<Completion> {
        let client = self.registry.client(provider)?;
        let strategy = OutputStrategy::select(kind.requires_structure(), client.capabilities());
        debug!(task = %kind, %provider, ?strategy, "Selected output strategy");

        let text = match (strategy, kind.schema()) {
            (OutputStrategy::SchemaEnforced, Some(schema)) => {
                client
                    .generate_schema_constrained(prompt, schema.definition())
                    .await?
            }
            (OutputStrategy::JsonMode, _) => client.generate_json_mode(prompt).await?,
            _ => client.generate_plain(prompt).await?,
        };

        Ok(Completion {
            text,
            model: client.model_name(),
        })
    }

    fn parse_structured<T: DeserializeOwned>(
        kind: TaskKind,
        provider: Provider,
        text: &str,
        defaults: &HashMap<&str, String>,
    ) -> GenResult<T> {
        let schema = kind.schema().ok_or_else(|| {
            GenerationError::Template(format!("{kind} has no response schema"))
        })?;
        let value = normalize_structured(provider, text, schema, defaults)?;
        serde_json::from_value(value).map_err(|e| {
            GenerationError::decode(provider, format!("Invalid {} response: {e}", kind.label()))
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
