//! Output strategy selection.

use serde::Serialize;

use super::provider::Capabilities;

/// How a generation call requests structure from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputStrategy {
    /// Pass the schema to the backend, which enforces it.
    SchemaEnforced,
    /// Ask the backend for syntactically valid JSON.
    JsonMode,
    /// Plain text; any JSON is parsed on a best-effort basis.
    PlainText,
}

impl OutputStrategy {
    /// Pick the strategy for a call.
    ///
    /// Priority is fixed: schema enforcement, then JSON mode, then plain
    /// text. Only capabilities matter, never which provider it is.
    pub fn select(requires_structure: bool, capabilities: Capabilities) -> Self {
        if requires_structure && capabilities.schema_enforced {
            Self::SchemaEnforced
        } else if requires_structure && capabilities.json_mode {
            Self::JsonMode
        } else {
            Self::PlainText
        }
    }
}
