//! Task kinds and their inputs.
//!
//! A [`TaskKind`] names the document being generated, the providers allowed
//! to generate it and, for structured kinds, the schema the reply must meet.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ai::schemas::{self, Schema};
use crate::ai::Provider;
use crate::errors::{GenResult, GenerationError};

/// Category of document being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    /// Product requirements document (structured).
    Prd,
    /// Single-paragraph project description.
    ProjectDescription,
    /// Multi-paragraph narrative task description.
    TaskDescriptionSimple,
    /// Structured task description.
    TaskDescriptionDetailed,
}

/// PRD generation excludes Gemini (slow, unreliable JSON).
const PRD_PROVIDERS: &[Provider] = &[Provider::Groq, Provider::OpenRouter];

const ALL_PROVIDERS: &[Provider] = &[Provider::Groq, Provider::OpenRouter, Provider::Gemini];

impl TaskKind {
    /// Providers allowed to generate this kind.
    pub fn supported_providers(self) -> &'static [Provider] {
        match self {
            Self::Prd => PRD_PROVIDERS,
            Self::ProjectDescription
            | Self::TaskDescriptionSimple
            | Self::TaskDescriptionDetailed => ALL_PROVIDERS,
        }
    }

    /// Whether `provider` is on this kind's allow-list.
    pub fn supports(self, provider: Provider) -> bool {
        self.supported_providers().contains(&provider)
    }

    /// Provider used when the caller does not pick one.
    pub fn default_provider(self) -> Provider {
        Provider::Groq
    }

    /// Target schema for structured kinds.
    pub fn schema(self) -> Option<&'static Schema> {
        match self {
            Self::Prd => Some(schemas::prd()),
            Self::TaskDescriptionDetailed => Some(schemas::task_description_detailed()),
            Self::ProjectDescription | Self::TaskDescriptionSimple => None,
        }
    }

    /// Whether the reply must be a structured object.
    pub fn requires_structure(self) -> bool {
        self.schema().is_some()
    }

    /// Human-readable document name, used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Prd => "PRD",
            Self::ProjectDescription => "project description",
            Self::TaskDescriptionSimple | Self::TaskDescriptionDetailed => "task description",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prd => "prd",
            Self::ProjectDescription => "project-description",
            Self::TaskDescriptionSimple => "task-description-simple",
            Self::TaskDescriptionDetailed => "task-description-detailed",
        };
        f.write_str(name)
    }
}

/// Tech stack section of a product input.
///
/// Like [`ProductInput`], it serializes back to what the caller sent:
/// absent fields stay absent and unknown fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechStackInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub frontend: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub backend: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub database: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hosting: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
    /// Fields the caller sent beyond the known ones
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TechStackInput {
    /// Whether nothing at all was supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Structured product description a PRD is generated from.
///
/// Embedded in the PRD prompt as received: empty fields are not serialized
/// and unknown fields are carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub product_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target_audience: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub primary_goals: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub high_level_problem: String,
    #[serde(skip_serializing_if = "TechStackInput::is_empty")]
    pub tech_stack: TechStackInput,
    /// Fields the caller sent beyond the known ones
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Which input channels a project description was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectInputMode {
    /// Free text only.
    SimplePrompt,
    /// Named fields only.
    StructuredInput,
    /// Named fields plus free text.
    Hybrid,
}

/// Input for a project description.
///
/// Either channel may be used: a free-text `simple_prompt`, the named
/// fields, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDescriptionInput {
    pub simple_prompt: Option<String>,
    pub project_name: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub target_users: Option<String>,
    pub key_features: Vec<String>,
}

impl ProjectDescriptionInput {
    /// Decide the input mode from which channels carry content.
    ///
    /// Key features alone do not make a structured input.
    pub fn mode(&self) -> GenResult<ProjectInputMode> {
        let has_structured = [
            &self.project_name,
            &self.category,
            &self.purpose,
            &self.target_users,
        ]
        .into_iter()
        .any(|field| present(field.as_deref()).is_some());
        let has_simple = present(self.simple_prompt.as_deref()).is_some();

        match (has_structured, has_simple) {
            (true, true) => Ok(ProjectInputMode::Hybrid),
            (true, false) => Ok(ProjectInputMode::StructuredInput),
            (false, true) => Ok(ProjectInputMode::SimplePrompt),
            (false, false) => Err(GenerationError::validation(
                "Either simplePrompt or structured fields (projectName, category, purpose, targetUsers) must be provided",
            )),
        }
    }
}

/// Narrative or structured task description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Short narrative text.
    Simple,
    /// Schema-constrained object.
    Detailed,
}

impl ResponseType {
    /// The task kind generated for this response type.
    pub fn task_kind(self) -> TaskKind {
        match self {
            Self::Simple => TaskKind::TaskDescriptionSimple,
            Self::Detailed => TaskKind::TaskDescriptionDetailed,
        }
    }
}

impl std::str::FromStr for ResponseType {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "detailed" => Ok(Self::Detailed),
            _ => Err(GenerationError::validation(
                "responseType must be either \"simple\" or \"detailed\"",
            )),
        }
    }
}

/// Technical requirements attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalRequirements {
    pub tech_stack: Vec<String>,
    pub frameworks: Vec<String>,
    pub apis: Vec<String>,
}

/// Input for a task description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskDescriptionInput {
    pub task_title: String,
    pub brief_description: String,
    pub project_context: String,
    pub project_description: Option<String>,
    pub task_type: Option<String>,
    pub priority: Option<String>,
    pub estimated_effort: Option<String>,
    pub technical_requirements: Option<TechnicalRequirements>,
    pub acceptance_criteria: Vec<String>,
    pub dependencies: Vec<String>,
    pub constraints: Option<String>,
}

impl TaskDescriptionInput {
    /// Check that the three required fields carry content.
    pub fn validate(&self) -> GenResult<()> {
        for (name, value) in [
            ("taskTitle", &self.task_title),
            ("briefDescription", &self.brief_description),
            ("projectContext", &self.project_context),
        ] {
            if value.trim().is_empty() {
                return Err(GenerationError::validation(format!("{name} is required")));
            }
        }
        Ok(())
    }
}

/// A trimmed, non-blank value, or `None`.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prd_excludes_gemini() {
        assert!(TaskKind::Prd.supports(Provider::Groq));
        assert!(TaskKind::Prd.supports(Provider::OpenRouter));
        assert!(!TaskKind::Prd.supports(Provider::Gemini));
    }

    #[test]
    fn test_other_kinds_allow_all_providers() {
        for kind in [
            TaskKind::ProjectDescription,
            TaskKind::TaskDescriptionSimple,
            TaskKind::TaskDescriptionDetailed,
        ] {
            for provider in Provider::ALL {
                assert!(kind.supports(provider), "{kind} should allow {provider}");
            }
        }
    }

    #[test]
    fn test_structure_requirements() {
        assert!(TaskKind::Prd.requires_structure());
        assert!(TaskKind::TaskDescriptionDetailed.requires_structure());
        assert!(!TaskKind::ProjectDescription.requires_structure());
        assert!(!TaskKind::TaskDescriptionSimple.requires_structure());
    }

    #[test]
    fn test_project_modes() {
        let simple = ProjectDescriptionInput {
            simple_prompt: Some("A habit tracker".to_string()),
            ..Default::default()
        };
        assert_eq!(simple.mode().unwrap(), ProjectInputMode::SimplePrompt);

        let structured = ProjectDescriptionInput {
            project_name: Some("Habitual".to_string()),
            category: Some("Productivity".to_string()),
            ..Default::default()
        };
        assert_eq!(structured.mode().unwrap(), ProjectInputMode::StructuredInput);

        let hybrid = ProjectDescriptionInput {
            simple_prompt: Some("A habit tracker".to_string()),
            ..structured
        };
        assert_eq!(hybrid.mode().unwrap(), ProjectInputMode::Hybrid);
    }

    #[test]
    fn test_project_mode_requires_a_channel() {
        let only_features = ProjectDescriptionInput {
            simple_prompt: Some("   ".to_string()),
            key_features: vec!["streaks".to_string()],
            ..Default::default()
        };
        assert!(only_features.mode().unwrap_err().is_client_error());
    }

    #[test]
    fn test_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&ProjectInputMode::StructuredInput).unwrap(),
            "\"structured_input\""
        );
    }

    #[test]
    fn test_response_type_parse() {
        assert_eq!("simple".parse::<ResponseType>().unwrap(), ResponseType::Simple);
        assert_eq!(
            "detailed".parse::<ResponseType>().unwrap().task_kind(),
            TaskKind::TaskDescriptionDetailed
        );
        assert!("verbose".parse::<ResponseType>().is_err());
    }

    #[test]
    fn test_task_input_validation() {
        let mut input = TaskDescriptionInput {
            task_title: "Add login".to_string(),
            brief_description: "OAuth login".to_string(),
            project_context: "Web app".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.project_context = " ".to_string();
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "projectContext is required");
    }

    #[test]
    fn test_product_input_camel_case() {
        let input: ProductInput = serde_json::from_str(
            r#"{"productName":"Acme","primaryGoals":["a"],"techStack":{"frontend":"React"}}"#,
        )
        .unwrap();
        assert_eq!(input.product_name, "Acme");
        assert_eq!(input.tech_stack.frontend, "React");
        assert!(input.tech_stack.other.is_none());
    }

    #[test]
    fn test_product_input_serializes_as_received() {
        let sent = serde_json::json!({
            "productName": "Acme",
            "techStack": { "frontend": "React", "mobile": "Flutter" },
            "budget": { "amount": 5000, "currency": "USD" }
        });
        let input: ProductInput = serde_json::from_value(sent.clone()).unwrap();

        assert_eq!(input.extra["budget"]["amount"], 5000);
        assert_eq!(serde_json::to_value(&input).unwrap(), sent);
    }
}
