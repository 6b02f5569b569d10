//! Request and response bodies, and the error response.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use docgen::{GenerationError, ProductInput, ProjectDescriptionInput, TaskDescriptionInput, TaskKind};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

/// Successful response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

/// Body of `POST /api/ai/generate-prd`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratePrdRequest {
    pub product_input: Option<ProductInput>,
    pub provider: Option<String>,
}

/// Body of `POST /api/ai/generate-project-description`.
#[derive(Debug, Deserialize)]
pub struct GenerateProjectDescriptionRequest {
    #[serde(flatten)]
    pub input: ProjectDescriptionInput,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Body of `POST /api/ai/generate-task-description`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTaskDescriptionRequest {
    #[serde(flatten)]
    pub input: TaskDescriptionInput,
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

/// Error response: `{success: false, error}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Map a generation failure: validation is the caller's fault (400),
    /// anything else is ours (500).
    pub fn from_generation(kind: TaskKind, err: &GenerationError) -> Self {
        if err.is_client_error() {
            warn!(task = %kind, error = %err, "Rejected generation request");
            return Self::bad_request(err.to_string());
        }

        error!(task = %kind, error = %err, "Generation failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to generate {}: {err}", kind.label()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "success": false, "error": self.message })),
        )
            .into_response()
    }
}
