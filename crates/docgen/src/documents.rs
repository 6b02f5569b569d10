//! Generated documents and the results that carry them.
//!
//! Structured documents are deserialized from repaired JSON, so every
//! required field is present. Field names follow the wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ai::Provider;
use crate::task::{ProjectInputMode, ResponseType};

/// High / Medium / Low rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

/// T-shirt size estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TshirtSize {
    #[serde(rename = "XS")]
    ExtraSmall,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub problem: String,
    pub solution: String,
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysis {
    pub market_size: String,
    pub growth_trends: Vec<String>,
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPersona {
    pub persona_name: String,
    pub description: String,
    pub goals: Vec<String>,
    pub pain_points: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimation {
    pub story_points: i64,
    pub tshirt_size: TshirtSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub priority: Level,
    pub user_stories: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub dependencies: Vec<String>,
    pub estimation: Estimation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub name: String,
    pub responsibilities: Vec<String>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub authentication: String,
    pub authorization: String,
    pub data_encryption: String,
    pub compliance: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Architecture {
    pub system_overview: String,
    pub components: Vec<Component>,
    pub data_flow: String,
    pub security: Security,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub name: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub phases: Vec<Phase>,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessMetric {
    pub metric: String,
    pub target: String,
    pub measurement_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub risk: String,
    pub impact: Level,
    pub probability: Level,
    pub mitigation_plan: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub frontend: String,
    pub backend: String,
    pub database: String,
    pub hosting: String,
    pub other: String,
}

/// Product requirements document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrdDocument {
    pub title: String,
    pub version: String,
    pub overview: Overview,
    pub market_analysis: MarketAnalysis,
    pub user_personas: Vec<UserPersona>,
    pub features: Vec<Feature>,
    pub architecture: Architecture,
    pub timeline: Timeline,
    pub success_metrics: Vec<SuccessMetric>,
    pub risks: Vec<Risk>,
    pub tech_stack: TechStack,
}

/// Structured task description.
///
/// The three optional fields are only present when non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptionDetailed {
    pub overview: String,
    pub detailed_description: String,
    pub technical_steps: Vec<String>,
    pub acceptance_criteria: Vec<String>,
    pub testing_requirements: Vec<String>,
    pub dependencies: Vec<String>,
    pub deliverables: Vec<String>,
    pub risks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_effort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
}

/// Generated PRD with provenance.
#[derive(Debug, Clone, Serialize)]
pub struct PrdResponse {
    pub provider: Provider,
    pub data: PrdDocument,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}

/// Generated project description with provenance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptionResponse {
    pub description: String,
    pub provider: Provider,
    pub model: String,
    pub generated_from: ProjectInputMode,
    pub timestamp: DateTime<Utc>,
}

/// Narrative or structured task description body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskDescription {
    Simple(String),
    Detailed(TaskDescriptionDetailed),
}

/// Generated task description with provenance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptionResponse {
    pub task_description: TaskDescription,
    pub response_type: ResponseType,
    pub provider: Provider,
    pub model: String,
    pub timestamp: DateTime<Utc>,
}
