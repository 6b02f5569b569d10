//! PRD prompt template.
//!
//! Embeds the product input and the full PRD schema.

use serde::Serialize;

use super::PromptTemplate;
use crate::ai::schemas;
use crate::task::ProductInput;

pub(super) const TEMPLATE_ID: &str = "prd";

/// Context for the PRD prompt.
#[derive(Debug, Clone, Serialize)]
pub struct PrdContext {
    /// Pretty-printed product input
    pub input_json: String,
    /// Pretty-printed PRD schema
    pub schema_json: String,
}

impl PrdContext {
    /// Build the context for `input`.
    pub fn new(input: &ProductInput) -> Self {
        Self {
            input_json: serde_json::to_string_pretty(input).unwrap_or_default(),
            schema_json: schemas::prd().to_pretty_json(),
        }
    }
}

/// Get the PRD template.
pub(super) fn template() -> PromptTemplate {
    PromptTemplate::new(TEMPLATE_ID, USER_PROMPT)
        .with_description("Generate a product requirements document as JSON")
}

const USER_PROMPT: &str = r#"Generate a comprehensive Product Requirements Document (PRD) in JSON format based on this product input:

{{input_json}}

Return a valid JSON object that follows this exact schema structure:
{{schema_json}}

IMPORTANT: All fields in the schema are required. You must include ALL fields in your response, at every level of nesting. If a field doesn't have a value, use an empty string "" (or an empty array [] for list fields) instead of omitting it.

Create a detailed, industry-standard PRD. Be specific, actionable, and realistic based on the provided tech stack."#;
