//! Project description prompt templates.
//!
//! One template per input mode. The hybrid template is the structured one
//! followed by the free-text context.

use serde::Serialize;

use super::{join_present, PromptTemplate};
use crate::task::{present, ProjectDescriptionInput, ProjectInputMode};

const SIMPLE_ID: &str = "project-description-simple";
const STRUCTURED_ID: &str = "project-description-structured";
const HYBRID_ID: &str = "project-description-hybrid";

/// Context for the project description prompts.
///
/// Absent and blank fields are `None` so their labels are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectDescriptionContext {
    pub simple_prompt: Option<String>,
    pub project_name: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub target_users: Option<String>,
    /// Key features joined with `", "`
    pub key_features: String,
}

impl ProjectDescriptionContext {
    /// Build the context for `input`.
    pub fn new(input: &ProjectDescriptionInput) -> Self {
        let owned = |value: &Option<String>| present(value.as_deref()).map(ToString::to_string);
        Self {
            simple_prompt: owned(&input.simple_prompt),
            project_name: owned(&input.project_name),
            category: owned(&input.category),
            purpose: owned(&input.purpose),
            target_users: owned(&input.target_users),
            key_features: join_present(&input.key_features),
        }
    }
}

pub(super) fn template_id(mode: ProjectInputMode) -> &'static str {
    match mode {
        ProjectInputMode::SimplePrompt => SIMPLE_ID,
        ProjectInputMode::StructuredInput => STRUCTURED_ID,
        ProjectInputMode::Hybrid => HYBRID_ID,
    }
}

/// Get the project description templates.
pub(super) fn templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::new(SIMPLE_ID, SIMPLE_PROMPT)
            .with_description("Describe a project from free text"),
        PromptTemplate::new(STRUCTURED_ID, STRUCTURED_PROMPT)
            .with_description("Describe a project from named fields"),
        PromptTemplate::new(HYBRID_ID, HYBRID_PROMPT)
            .with_description("Describe a project from named fields plus free text"),
    ]
}

macro_rules! structured_prompt {
    () => {
        r"Generate a clear, professional project description (2-3 sentences, around 100 words) based on these details:{{#if project_name}}

Project Name: {{project_name}}{{/if}}{{#if category}}
Category: {{category}}{{/if}}{{#if purpose}}
Purpose: {{purpose}}{{/if}}{{#if target_users}}
Target Users: {{target_users}}{{/if}}{{#if key_features}}
Key Features: {{key_features}}{{/if}}

Write a cohesive description that explains what the project is, who it's for, and its main value proposition. Use a professional tone suitable for a project tracker or portfolio."
    };
}

const SIMPLE_PROMPT: &str = r"Generate a clear, professional project description (2-3 sentences, around 100 words) for the following project:

{{simple_prompt}}

The description should explain what the project is, who it's for, and its main value proposition. Write in a professional tone suitable for a project tracker or portfolio.";

const STRUCTURED_PROMPT: &str = structured_prompt!();

const HYBRID_PROMPT: &str = concat!(
    structured_prompt!(),
    r"

Additional context: {{simple_prompt}}

Incorporate this additional context into the description naturally."
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::prompts::PromptManager;

    fn structured_input() -> ProjectDescriptionInput {
        ProjectDescriptionInput {
            project_name: Some("Habitual".to_string()),
            category: Some("Productivity".to_string()),
            purpose: Some("Track habits".to_string()),
            key_features: vec!["streaks".to_string(), "reminders".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_prompt() {
        let input = ProjectDescriptionInput {
            simple_prompt: Some("A habit tracker for students".to_string()),
            ..Default::default()
        };
        let (prompt, mode) = PromptManager::new().project_description_prompt(&input).unwrap();
        assert_eq!(mode, ProjectInputMode::SimplePrompt);
        assert!(prompt.contains("for the following project:\n\nA habit tracker for students\n\n"));
    }

    #[test]
    fn test_structured_prompt_omits_absent_labels() {
        let (prompt, mode) = PromptManager::new()
            .project_description_prompt(&structured_input())
            .unwrap();
        assert_eq!(mode, ProjectInputMode::StructuredInput);
        assert!(prompt.contains(
            "based on these details:\n\nProject Name: Habitual\nCategory: Productivity\nPurpose: Track habits\nKey Features: streaks, reminders\n\nWrite a cohesive description"
        ));
        assert!(!prompt.contains("Target Users"));
        assert!(!prompt.contains("Additional context"));
    }

    #[test]
    fn test_hybrid_prompt_appends_context() {
        let input = ProjectDescriptionInput {
            simple_prompt: Some("Built for college students".to_string()),
            target_users: Some("Students".to_string()),
            ..structured_input()
        };
        let (prompt, mode) = PromptManager::new().project_description_prompt(&input).unwrap();
        assert_eq!(mode, ProjectInputMode::Hybrid);
        assert!(prompt.contains("Target Users: Students\n"));
        assert!(prompt.ends_with(
            "portfolio.\n\nAdditional context: Built for college students\n\nIncorporate this additional context into the description naturally."
        ));
    }

    #[test]
    fn test_no_channel_is_rejected() {
        let err = PromptManager::new()
            .project_description_prompt(&ProjectDescriptionInput::default())
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
