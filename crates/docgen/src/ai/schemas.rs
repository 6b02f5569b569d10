//! Response schemas for structured documents.
//!
//! Each schema is a closed JSON Schema object. It is embedded in prompts,
//! passed to schema-enforcing backends, and drives the repair pass in
//! [`crate::normalize`].

use std::sync::LazyLock;

use serde_json::{json, Value};

/// A closed object schema plus the fallbacks used to repair replies.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    definition: Value,
    enum_fallbacks: &'static [(&'static str, &'static str)],
    optional_fields: &'static [&'static str],
}

impl Schema {
    /// Schema name, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The JSON Schema definition.
    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// Fallback for an enumerated property, by property name.
    pub fn enum_fallback(&self, property: &str) -> Option<&'static str> {
        self.enum_fallbacks
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| *value)
    }

    /// Top-level fields the schema requires but which are kept only when
    /// they end up non-empty.
    pub fn optional_fields(&self) -> &'static [&'static str] {
        self.optional_fields
    }

    /// Pretty-printed definition, as embedded in prompts.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.definition).unwrap_or_default()
    }
}

static PRD: LazyLock<Schema> = LazyLock::new(|| Schema {
    name: "prd",
    definition: prd_definition(),
    enum_fallbacks: &[
        ("priority", "Medium"),
        ("tshirtSize", "M"),
        ("impact", "Medium"),
        ("probability", "Medium"),
    ],
    optional_fields: &[],
});

static TASK_DESCRIPTION_DETAILED: LazyLock<Schema> = LazyLock::new(|| Schema {
    name: "task_description_detailed",
    definition: task_description_detailed_definition(),
    enum_fallbacks: &[],
    optional_fields: &["estimatedEffort", "notes", "userStory"],
});

/// Product requirements document schema.
pub fn prd() -> &'static Schema {
    &PRD
}

/// Detailed task description schema.
pub fn task_description_detailed() -> &'static Schema {
    &TASK_DESCRIPTION_DETAILED
}

fn string_array() -> Value {
    json!({ "type": "array", "items": { "type": "string" } })
}

fn level_enum() -> Value {
    json!({ "type": "string", "enum": ["High", "Medium", "Low"] })
}

#[allow(clippy::too_many_lines)]
fn prd_definition() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "title": { "type": "string" },
            "version": { "type": "string" },
            "overview": {
                "type": "object",
                "additionalProperties": false,
                "required": ["problem", "solution", "objectives"],
                "properties": {
                    "problem": { "type": "string" },
                    "solution": { "type": "string" },
                    "objectives": string_array()
                }
            },
            "marketAnalysis": {
                "type": "object",
                "additionalProperties": false,
                "required": ["marketSize", "growthTrends", "competitors"],
                "properties": {
                    "marketSize": { "type": "string" },
                    "growthTrends": string_array(),
                    "competitors": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["name", "strengths", "weaknesses"],
                            "properties": {
                                "name": { "type": "string" },
                                "strengths": string_array(),
                                "weaknesses": string_array()
                            }
                        }
                    }
                }
            },
            "userPersonas": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["personaName", "description", "goals", "painPoints"],
                    "properties": {
                        "personaName": { "type": "string" },
                        "description": { "type": "string" },
                        "goals": string_array(),
                        "painPoints": string_array()
                    }
                }
            },
            "features": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": [
                        "name",
                        "description",
                        "priority",
                        "userStories",
                        "acceptanceCriteria",
                        "dependencies",
                        "estimation"
                    ],
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "priority": level_enum(),
                        "userStories": string_array(),
                        "acceptanceCriteria": string_array(),
                        "dependencies": string_array(),
                        "estimation": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["storyPoints", "tshirtSize"],
                            "properties": {
                                "storyPoints": { "type": "integer" },
                                "tshirtSize": { "type": "string", "enum": ["XS", "S", "M", "L", "XL"] }
                            }
                        }
                    }
                }
            },
            "architecture": {
                "type": "object",
                "additionalProperties": false,
                "required": ["systemOverview", "components", "dataFlow", "security"],
                "properties": {
                    "systemOverview": { "type": "string" },
                    "components": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["name", "responsibilities", "interfaces"],
                            "properties": {
                                "name": { "type": "string" },
                                "responsibilities": string_array(),
                                "interfaces": string_array()
                            }
                        }
                    },
                    "dataFlow": { "type": "string" },
                    "security": {
                        "type": "object",
                        "additionalProperties": false,
                        "required": ["authentication", "authorization", "dataEncryption", "compliance"],
                        "properties": {
                            "authentication": { "type": "string" },
                            "authorization": { "type": "string" },
                            "dataEncryption": { "type": "string" },
                            "compliance": string_array()
                        }
                    }
                }
            },
            "timeline": {
                "type": "object",
                "additionalProperties": false,
                "required": ["phases", "milestones"],
                "properties": {
                    "phases": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["name", "startDate", "endDate", "deliverables"],
                            "properties": {
                                "name": { "type": "string" },
                                "startDate": { "type": "string" },
                                "endDate": { "type": "string" },
                                "deliverables": string_array()
                            }
                        }
                    },
                    "milestones": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["name", "date", "description"],
                            "properties": {
                                "name": { "type": "string" },
                                "date": { "type": "string" },
                                "description": { "type": "string" }
                            }
                        }
                    }
                }
            },
            "successMetrics": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["metric", "target", "measurementMethod"],
                    "properties": {
                        "metric": { "type": "string" },
                        "target": { "type": "string" },
                        "measurementMethod": { "type": "string" }
                    }
                }
            },
            "risks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["risk", "impact", "probability", "mitigationPlan"],
                    "properties": {
                        "risk": { "type": "string" },
                        "impact": level_enum(),
                        "probability": level_enum(),
                        "mitigationPlan": { "type": "string" }
                    }
                }
            },
            "techStack": {
                "type": "object",
                "additionalProperties": false,
                "required": ["frontend", "backend", "database", "hosting", "other"],
                "properties": {
                    "frontend": { "type": "string" },
                    "backend": { "type": "string" },
                    "database": { "type": "string" },
                    "hosting": { "type": "string" },
                    "other": { "type": "string" }
                }
            }
        },
        "required": [
            "title",
            "version",
            "overview",
            "marketAnalysis",
            "userPersonas",
            "features",
            "architecture",
            "timeline",
            "successMetrics",
            "risks",
            "techStack"
        ]
    })
}

fn described(kind: &str, description: &str) -> Value {
    if kind == "array" {
        json!({ "type": "array", "items": { "type": "string" }, "description": description })
    } else {
        json!({ "type": kind, "description": description })
    }
}

fn task_description_detailed_definition() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "overview": described("string", "Brief overview of the task (2-3 sentences)"),
            "detailedDescription": described(
                "string",
                "Comprehensive description of the task and what needs to be accomplished"
            ),
            "technicalSteps": described("array", "Step-by-step technical implementation approach"),
            "acceptanceCriteria": described(
                "array",
                "List of acceptance criteria that must be met for task completion"
            ),
            "testingRequirements": described("array", "Testing requirements and test cases needed"),
            "dependencies": described("array", "List of dependencies, prerequisites, or related tasks"),
            "deliverables": described("array", "Expected deliverables and outputs from this task"),
            "risks": described("array", "Potential risks and challenges associated with the task"),
            "estimatedEffort": described("string", "Estimated effort or time required (optional)"),
            "notes": described(
                "string",
                "Additional notes, considerations, or constraints (optional)"
            ),
            "userStory": described(
                "string",
                "User story in format: \"As a [user], I want [goal] so that [benefit]\" (optional)"
            )
        },
        "required": [
            "overview",
            "detailedDescription",
            "technicalSteps",
            "acceptanceCriteria",
            "testingRequirements",
            "dependencies",
            "deliverables",
            "risks",
            "estimatedEffort",
            "notes",
            "userStory"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(value: &Value) -> Vec<&str> {
        value["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_prd_top_level_required() {
        let def = prd().definition();
        assert_eq!(
            required(def),
            [
                "title",
                "version",
                "overview",
                "marketAnalysis",
                "userPersonas",
                "features",
                "architecture",
                "timeline",
                "successMetrics",
                "risks",
                "techStack"
            ]
        );
        assert_eq!(def["additionalProperties"], json!(false));
    }

    #[test]
    fn test_prd_estimation_shape() {
        let estimation = &prd().definition()["properties"]["features"]["items"]["properties"]["estimation"];
        assert_eq!(required(estimation), ["storyPoints", "tshirtSize"]);
        assert_eq!(
            estimation["properties"]["tshirtSize"]["enum"],
            json!(["XS", "S", "M", "L", "XL"])
        );
        assert_eq!(estimation["properties"]["storyPoints"]["type"], "integer");
    }

    #[test]
    fn test_prd_enum_fallbacks_are_members() {
        let features = &prd().definition()["properties"]["features"]["items"]["properties"];
        let sizes = features["estimation"]["properties"]["tshirtSize"]["enum"].as_array().unwrap();
        assert!(sizes.contains(&json!(prd().enum_fallback("tshirtSize").unwrap())));
        let levels = features["priority"]["enum"].as_array().unwrap();
        assert!(levels.contains(&json!(prd().enum_fallback("priority").unwrap())));
        assert!(prd().enum_fallback("title").is_none());
    }

    #[test]
    fn test_task_schema_requires_all_eleven() {
        let def = task_description_detailed().definition();
        assert_eq!(required(def).len(), 11);
        assert_eq!(def["properties"].as_object().unwrap().len(), 11);
        for optional in task_description_detailed().optional_fields() {
            assert!(required(def).contains(optional));
        }
    }

    #[test]
    fn test_pretty_json_preserves_declaration_order() {
        let pretty = task_description_detailed().to_pretty_json();
        let overview = pretty.find("\"overview\"").unwrap();
        let user_story = pretty.find("\"userStory\"").unwrap();
        assert!(overview < user_story);
        assert!(pretty.starts_with("{\n  \"type\": \"object\""));
    }
}
