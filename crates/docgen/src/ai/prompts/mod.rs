//! Prompt template system.
//!
//! This module provides:
//! - Handlebars-based prompt templates
//! - Pre-defined templates for every document kind
//! - Builders that turn validated inputs into rendered prompts

use std::collections::HashMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::errors::{GenResult, GenerationError};
use crate::task::{ProductInput, ProjectDescriptionInput, ProjectInputMode, ResponseType, TaskDescriptionInput};

mod prd;
mod project_description;
mod task_description;

pub use prd::PrdContext;
pub use project_description::ProjectDescriptionContext;
pub use task_description::{TaskDescriptionContext, TechnicalContext};

/// A single-message prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID
    pub id: String,
    /// Template version
    pub version: String,
    /// Description
    pub description: String,
    /// Prompt template body
    pub body: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: "1.0.0".to_string(),
            description: String::new(),
            body: body.into(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> GenResult<String> {
        let mut handlebars = create_handlebars();
        handlebars.register_template_string(&self.id, &self.body)?;
        Ok(handlebars.render(&self.id, context)?)
    }
}

/// Create a Handlebars instance for prompt rendering.
fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
}

/// Join the non-blank entries of a list with `", "`.
fn join_present(items: &[String]) -> String {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt manager holding every known template.
#[derive(Debug)]
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Create a new prompt manager with default templates.
    pub fn new() -> Self {
        let mut manager = Self {
            templates: HashMap::new(),
        };

        manager.register(prd::template());
        for template in project_description::templates() {
            manager.register(template);
        }
        for template in task_description::templates() {
            manager.register(template);
        }

        manager
    }

    /// Register a template, replacing any with the same ID.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID.
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a template with context.
    pub fn render<T: Serialize>(&self, id: &str, context: &T) -> GenResult<String> {
        let template = self
            .get(id)
            .ok_or_else(|| GenerationError::Template(format!("Template '{id}' not found")))?;
        template.render(context)
    }

    /// List all template IDs.
    pub fn template_ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Build the PRD prompt, embedding the input and the PRD schema.
    pub fn prd_prompt(&self, input: &ProductInput) -> GenResult<String> {
        self.render(prd::TEMPLATE_ID, &PrdContext::new(input))
    }

    /// Build the project description prompt and report which input mode
    /// it was built from.
    pub fn project_description_prompt(
        &self,
        input: &ProjectDescriptionInput,
    ) -> GenResult<(String, ProjectInputMode)> {
        let mode = input.mode()?;
        let context = ProjectDescriptionContext::new(input);
        let prompt = self.render(project_description::template_id(mode), &context)?;
        Ok((prompt, mode))
    }

    /// Build the task description prompt for the requested response type.
    pub fn task_description_prompt(
        &self,
        response_type: ResponseType,
        input: &TaskDescriptionInput,
    ) -> GenResult<String> {
        let context = TaskDescriptionContext::new(input);
        self.render(task_description::template_id(response_type), &context)
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new()
    }
}
