//! Task description prompt templates.

use serde::Serialize;

use super::{join_present, PromptTemplate};
use crate::ai::schemas;
use crate::task::{present, ResponseType, TaskDescriptionInput};

const SIMPLE_ID: &str = "task-description-simple";
const DETAILED_ID: &str = "task-description-detailed";

/// Technical requirements, each list joined with `", "`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TechnicalContext {
    pub tech_stack: String,
    pub frameworks: String,
    pub apis: String,
}

/// Context for the task description prompts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskDescriptionContext {
    pub task_title: String,
    pub brief_description: String,
    pub project_context: String,
    pub project_description: Option<String>,
    pub task_type: Option<String>,
    pub priority: Option<String>,
    pub estimated_effort: Option<String>,
    /// Present whenever the input carries a requirements block, even an
    /// empty one
    pub technical_requirements: Option<TechnicalContext>,
    pub acceptance_criteria: String,
    pub dependencies: String,
    pub constraints: Option<String>,
    /// Pretty-printed detailed task schema
    pub schema_json: String,
}

impl TaskDescriptionContext {
    /// Build the context for `input`.
    pub fn new(input: &TaskDescriptionInput) -> Self {
        let owned = |value: &Option<String>| present(value.as_deref()).map(ToString::to_string);
        Self {
            task_title: input.task_title.trim().to_string(),
            brief_description: input.brief_description.trim().to_string(),
            project_context: input.project_context.trim().to_string(),
            project_description: owned(&input.project_description),
            task_type: owned(&input.task_type),
            priority: owned(&input.priority),
            estimated_effort: owned(&input.estimated_effort),
            technical_requirements: input.technical_requirements.as_ref().map(|req| TechnicalContext {
                tech_stack: join_present(&req.tech_stack),
                frameworks: join_present(&req.frameworks),
                apis: join_present(&req.apis),
            }),
            acceptance_criteria: join_present(&input.acceptance_criteria),
            dependencies: join_present(&input.dependencies),
            constraints: owned(&input.constraints),
            schema_json: schemas::task_description_detailed().to_pretty_json(),
        }
    }
}

pub(super) fn template_id(response_type: ResponseType) -> &'static str {
    match response_type {
        ResponseType::Simple => SIMPLE_ID,
        ResponseType::Detailed => DETAILED_ID,
    }
}

/// Get the task description templates.
pub(super) fn templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::new(SIMPLE_ID, SIMPLE_PROMPT)
            .with_description("Write a short narrative task description"),
        PromptTemplate::new(DETAILED_ID, DETAILED_PROMPT)
            .with_description("Generate a structured task description as JSON"),
    ]
}

const SIMPLE_PROMPT: &str = r"Generate a clear, professional task description (2-3 paragraphs, around 150-200 words) for the following task:

Task Title: {{task_title}}
Brief Description: {{brief_description}}
Project Context: {{project_context}}{{#if task_type}}
Task Type: {{task_type}}{{/if}}{{#if priority}}
Priority: {{priority}}{{/if}}

The description should be comprehensive and include:
- What needs to be accomplished
- Why this task is important for the project
- Key considerations or requirements

Write in a professional tone suitable for a project management or task tracking system. Make it clear, actionable, and informative.";

const DETAILED_PROMPT: &str = r#"Generate a comprehensive task description in JSON format for the following task:

Task Title: {{task_title}}
Brief Description: {{brief_description}}
Project Context: {{project_context}}{{#if project_description}}
Project Description: {{project_description}}{{/if}}{{#if task_type}}
Task Type: {{task_type}}{{/if}}{{#if priority}}
Priority: {{priority}}{{/if}}{{#if estimated_effort}}
Estimated Effort: {{estimated_effort}}{{/if}}{{#if technical_requirements}}
Technical Requirements:{{#if technical_requirements.tech_stack}}
- Tech Stack: {{technical_requirements.tech_stack}}{{/if}}{{#if technical_requirements.frameworks}}
- Frameworks: {{technical_requirements.frameworks}}{{/if}}{{#if technical_requirements.apis}}
- APIs: {{technical_requirements.apis}}{{/if}}{{/if}}{{#if acceptance_criteria}}
Acceptance Criteria (provided): {{acceptance_criteria}}{{/if}}{{#if dependencies}}
Dependencies: {{dependencies}}{{/if}}{{#if constraints}}
Constraints: {{constraints}}{{/if}}

Return a valid JSON object that follows this exact schema structure:
{{schema_json}}

IMPORTANT: All fields in the schema are required. You must include ALL fields in your response:
- overview: Brief overview (2-3 sentences)
- detailedDescription: Comprehensive description
- technicalSteps: Array of step-by-step technical implementation steps
- acceptanceCriteria: Array of acceptance criteria (use provided ones if given, or generate comprehensive ones)
- testingRequirements: Array of testing requirements
- dependencies: Array of dependencies/prerequisites
- deliverables: Array of expected deliverables
- risks: Array of potential risks
- estimatedEffort: Estimated effort (use provided value if given, or generate one, or empty string "")
- notes: Additional notes/constraints (use provided constraints if given, or empty string "")
- userStory: User story in format "As a [user], I want [goal] so that [benefit]" (or empty string "" if not applicable)

Guidelines:
- Make all content specific, actionable, and relevant to the task
- Generate comprehensive, detailed information for all required fields
- If a field doesn't have a value, use an empty string "" instead of omitting it"#;
