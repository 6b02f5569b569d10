//! Response normalization.
//!
//! Narrative replies are stripped of markdown and labels. Structured replies
//! are parsed and repaired against their [`Schema`]: required fields are
//! always present afterwards, optional fields only when non-empty.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::ai::schemas::Schema;
use crate::ai::{strip_code_fences, Provider};
use crate::errors::{GenResult, GenerationError};

static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^```.*\n?").unwrap());
static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)```\n?$").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#+\s+").unwrap());
static PROJECT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(project )?description:\s*").unwrap());
static TASK_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(task )?description:\s*").unwrap());
static PARAGRAPH_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());
static EXCESS_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Remove fences, heading markers and emphasis, then trim.
fn strip_markdown(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = FENCE_OPEN.replace_all(&text, "");
    let text = FENCE_CLOSE.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "");
    text.replace('*', "").trim().to_string()
}

/// Clean a project description into a single paragraph.
pub fn clean_project_description(raw: &str) -> String {
    let text = strip_markdown(raw);
    let text = PROJECT_LABEL.replace(&text, "");
    let text = PARAGRAPH_BREAKS.replace_all(&text, " ");
    text.replace('\n', " ").trim().to_string()
}

/// Clean a task description, keeping at most one blank line between
/// paragraphs.
pub fn clean_task_description(raw: &str) -> String {
    let text = strip_markdown(raw);
    let text = TASK_LABEL.replace(&text, "");
    EXCESS_BREAKS.replace_all(&text, "\n\n").trim().to_string()
}

/// Parse a structured reply and repair it against `schema`.
///
/// `caller_defaults` supplies values for the schema's optional fields; each
/// optional field keeps the parsed value if non-empty, else the caller's
/// value if non-empty, else it is removed.
pub fn normalize_structured(
    provider: Provider,
    text: &str,
    schema: &Schema,
    caller_defaults: &HashMap<&str, String>,
) -> GenResult<Value> {
    let text = strip_code_fences(text);
    let mut value: Value = serde_json::from_str(&text).map_err(|e| {
        GenerationError::decode(provider, format!("Failed to parse {} response: {e}", schema.name()))
    })?;

    if !value.is_object() {
        return Err(GenerationError::decode(
            provider,
            format!("{} response is not a JSON object", schema.name()),
        ));
    }

    let repaired = repair(&mut value, schema);
    if !repaired.is_empty() {
        warn!(
            schema = schema.name(),
            count = repaired.len(),
            fields = ?repaired,
            "Filled missing or invalid fields with fallbacks"
        );
    }

    merge_optional_fields(&mut value, schema, caller_defaults);
    Ok(value)
}

/// Repair `value` in place so every required field exists with the right
/// type. Returns the paths that were filled or replaced.
pub fn repair(value: &mut Value, schema: &Schema) -> Vec<String> {
    let mut repaired = Vec::new();
    repair_value(value, schema.definition(), schema, "", "", &mut repaired);
    repaired
}

fn schema_type(def: &Value) -> &str {
    def.get("type").and_then(Value::as_str).unwrap_or("")
}

fn type_matches(value: &Value, def: &Value) -> bool {
    match schema_type(def) {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "integer" | "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        _ => true,
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Documented fallback for a property.
fn fallback(name: &str, def: &Value, schema: &Schema) -> Value {
    match schema_type(def) {
        "string" => match def.get("enum").and_then(Value::as_array) {
            Some(members) => schema
                .enum_fallback(name)
                .map(Value::from)
                .or_else(|| members.first().cloned())
                .unwrap_or_else(|| Value::String(String::new())),
            None => Value::String(String::new()),
        },
        "array" => Value::Array(Vec::new()),
        "integer" | "number" => Value::Number(Number::from(0)),
        "boolean" => Value::Bool(false),
        "object" => {
            let mut object = Map::new();
            let required = required_fields(def);
            if let Some(properties) = def.get("properties").and_then(Value::as_object) {
                for (prop, prop_def) in properties {
                    if required.contains(&prop.as_str()) {
                        object.insert(prop.clone(), fallback(prop, prop_def, schema));
                    }
                }
            }
            Value::Object(object)
        }
        _ => Value::Null,
    }
}

fn required_fields(def: &Value) -> Vec<&str> {
    def.get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Coerce a scalar into the declared scalar type where that is lossless
/// enough to be useful.
#[allow(clippy::cast_possible_truncation)]
fn coerce_scalar(value: &Value, def: &Value) -> Option<Value> {
    match (schema_type(def), value) {
        ("string", Value::Number(n)) => Some(Value::String(n.to_string())),
        ("string", Value::Bool(b)) => Some(Value::String(b.to_string())),
        ("integer", Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        ("integer", Value::Number(n)) if n.as_i64().is_none() => {
            n.as_f64().map(|f| Value::from(f.round() as i64))
        }
        _ => None,
    }
}

fn repair_value(
    value: &mut Value,
    def: &Value,
    schema: &Schema,
    name: &str,
    path: &str,
    repaired: &mut Vec<String>,
) {
    if let Some(coerced) = coerce_scalar(value, def) {
        *value = coerced;
    }

    if value.is_null() || !type_matches(value, def) {
        *value = fallback(name, def, schema);
        repaired.push(path.to_string());
        return;
    }

    match schema_type(def) {
        "object" => repair_object(value, def, schema, path, repaired),
        "array" => {
            if let (Some(items_def), Value::Array(items)) = (def.get("items"), value) {
                for (index, item) in items.iter_mut().enumerate() {
                    let item_path = format!("{path}[{index}]");
                    repair_value(item, items_def, schema, name, &item_path, repaired);
                }
            }
        }
        "string" => {
            if let Some(members) = def.get("enum").and_then(Value::as_array) {
                if !members.contains(value) {
                    *value = fallback(name, def, schema);
                    repaired.push(path.to_string());
                }
            }
        }
        _ => {}
    }
}

fn repair_object(
    value: &mut Value,
    def: &Value,
    schema: &Schema,
    path: &str,
    repaired: &mut Vec<String>,
) {
    let Value::Object(original) = value else {
        return;
    };
    let Some(properties) = def.get("properties").and_then(Value::as_object) else {
        return;
    };
    let required = required_fields(def);
    let closed = def.get("additionalProperties") == Some(&Value::Bool(false));

    let mut source = std::mem::take(original);
    let mut rebuilt = Map::new();

    for (prop, prop_def) in properties {
        let prop_path = join_path(path, prop);
        match source.remove(prop) {
            Some(mut field) => {
                repair_value(&mut field, prop_def, schema, prop, &prop_path, repaired);
                rebuilt.insert(prop.clone(), field);
            }
            None if required.contains(&prop.as_str()) => {
                rebuilt.insert(prop.clone(), fallback(prop, prop_def, schema));
                repaired.push(prop_path);
            }
            None => {}
        }
    }

    if closed {
        for extra in source.keys() {
            debug!(field = %join_path(path, extra), "Dropping property not declared in schema");
        }
    } else {
        rebuilt.extend(source);
    }

    *original = rebuilt;
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn merge_optional_fields(value: &mut Value, schema: &Schema, caller_defaults: &HashMap<&str, String>) {
    let Value::Object(object) = value else {
        return;
    };

    for field in schema.optional_fields() {
        let parsed = non_empty(object.get(*field).and_then(Value::as_str)).map(ToString::to_string);
        let merged = parsed.or_else(|| {
            non_empty(caller_defaults.get(field).map(String::as_str)).map(ToString::to_string)
        });

        match merged {
            Some(text) => {
                object.insert((*field).to_string(), Value::String(text));
            }
            None => {
                object.shift_remove(*field);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::schemas;
    use serde_json::json;

    #[test]
    fn test_project_description_single_paragraph() {
        let raw = "```markdown\n## Description: A **fast** app.\n\n\nIt helps *teams*.\nDaily.\n```";
        assert_eq!(
            clean_project_description(raw),
            "A fast app. It helps teams. Daily."
        );
    }

    #[test]
    fn test_project_description_label_removed() {
        assert_eq!(
            clean_project_description("Project Description:   Habitual tracks habits."),
            "Habitual tracks habits."
        );
        assert_eq!(
            clean_project_description("description: lower case label"),
            "lower case label"
        );
    }

    #[test]
    fn test_task_description_keeps_paragraphs() {
        let raw = "## Task Description: Build login\n\n\n\nSecond paragraph with **bold**.\n\nThird.";
        assert_eq!(
            clean_task_description(raw),
            "Build login\n\nSecond paragraph with bold.\n\nThird."
        );
    }

    #[test]
    fn test_task_description_crlf() {
        assert_eq!(clean_task_description("One\r\n\r\n\r\n\r\nTwo"), "One\n\nTwo");
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = normalize_structured(Provider::Gemini, "not json", schemas::prd(), &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::Decode { provider: Provider::Gemini, .. }));
    }

    #[test]
    fn test_non_object_is_decode_error() {
        let err = normalize_structured(Provider::Groq, "[1, 2]", schemas::prd(), &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, GenerationError::Decode { .. }));
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let value = normalize_structured(
            Provider::OpenRouter,
            "```json\n{\"title\": \"Acme\"}\n```",
            schemas::prd(),
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(value["title"], "Acme");
    }

    #[test]
    fn test_prd_feature_estimation_fallback() {
        let mut value = json!({
            "title": "Acme",
            "features": [
                { "name": "Login", "priority": "High" },
                { "name": "Search", "estimation": { "storyPoints": 5 } },
                { "name": "Export", "estimation": { "storyPoints": "8", "tshirtSize": "Huge" } }
            ]
        });
        let repaired = repair(&mut value, schemas::prd());

        let features = value["features"].as_array().unwrap();
        assert_eq!(features[0]["estimation"], json!({ "storyPoints": 0, "tshirtSize": "M" }));
        assert_eq!(features[0]["dependencies"], json!([]));
        assert_eq!(features[0]["priority"], "High");
        assert_eq!(features[1]["estimation"], json!({ "storyPoints": 5, "tshirtSize": "M" }));
        assert_eq!(features[1]["priority"], "Medium");
        assert_eq!(features[2]["estimation"], json!({ "storyPoints": 8, "tshirtSize": "M" }));
        assert!(repaired.contains(&"features[0].estimation".to_string()));
        assert!(repaired.contains(&"features[2].estimation.tshirtSize".to_string()));
    }

    #[test]
    fn test_prd_required_sections_always_present() {
        let mut value = json!({ "title": "Acme", "techStack": { "frontend": "React" } });
        repair(&mut value, schemas::prd());

        let object = value.as_object().unwrap();
        for field in [
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
            "techStack",
        ] {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(value["techStack"]["other"], "");
        assert_eq!(value["architecture"]["security"]["compliance"], json!([]));
        assert_eq!(value["overview"]["objectives"], json!([]));
    }

    #[test]
    fn test_closed_schema_drops_unknown_fields() {
        let mut value = json!({ "title": "Acme", "appendices": [], "overview": { "problem": "p", "extra": 1 } });
        repair(&mut value, schemas::prd());
        assert!(value.get("appendices").is_none());
        assert!(value["overview"].get("extra").is_none());
    }

    #[test]
    fn test_repair_preserves_schema_order() {
        let mut value = json!({ "version": "1.0", "title": "Acme" });
        repair(&mut value, schemas::prd());
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "title");
        assert_eq!(keys[1], "version");
    }

    #[test]
    fn test_string_items_coerced() {
        let mut value = json!({ "overview": { "objectives": ["grow", 42, null] } });
        repair(&mut value, schemas::prd());
        assert_eq!(value["overview"]["objectives"], json!(["grow", "42", ""]));
    }

    #[test]
    fn test_optional_merge_then_prune() {
        let reply = r#"{
            "overview": "Add login",
            "technicalSteps": ["step"],
            "notes": "",
            "estimatedEffort": "  "
        }"#;
        let mut defaults = HashMap::new();
        defaults.insert("notes", "none".to_string());
        defaults.insert("estimatedEffort", String::new());

        let value = normalize_structured(
            Provider::Groq,
            reply,
            schemas::task_description_detailed(),
            &defaults,
        )
        .unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(value["notes"], "none");
        assert!(!object.contains_key("userStory"));
        assert!(!object.contains_key("estimatedEffort"));
        for field in [
            "overview",
            "detailedDescription",
            "technicalSteps",
            "acceptanceCriteria",
            "testingRequirements",
            "dependencies",
            "deliverables",
            "risks",
        ] {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(value["detailedDescription"], "");
        assert_eq!(value["risks"], json!([]));
    }

    #[test]
    fn test_parsed_optional_wins_over_caller_default() {
        let reply = r#"{"notes": "from model", "userStory": "As a user, I want X so that Y"}"#;
        let mut defaults = HashMap::new();
        defaults.insert("notes", "from caller".to_string());

        let value = normalize_structured(
            Provider::Groq,
            reply,
            schemas::task_description_detailed(),
            &defaults,
        )
        .unwrap();
        assert_eq!(value["notes"], "from model");
        assert_eq!(value["userStory"], "As a user, I want X so that Y");
    }
}
