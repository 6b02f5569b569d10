//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use docgen::{
    PrdResponse, ProjectDescriptionResponse, ResponseType, TaskDescriptionResponse, TaskKind,
};
use tracing::info;

use crate::api::{
    ApiError, ApiResponse, GeneratePrdRequest, GenerateProjectDescriptionRequest,
    GenerateTaskDescriptionRequest, HealthResponse,
};
use crate::server::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "API is running",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/ai/generate-prd`
pub async fn generate_prd(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GeneratePrdRequest>, JsonRejection>,
) -> ApiResult<PrdResponse> {
    let Json(request) = payload?;
    let input = request
        .product_input
        .ok_or_else(|| ApiError::bad_request("Product input is required"))?;

    info!(provider = ?request.provider, "PRD requested");

    state
        .generator
        .generate_prd(&input, request.provider.as_deref())
        .await
        .map(ApiResponse::ok)
        .map_err(|e| ApiError::from_generation(TaskKind::Prd, &e))
}

/// `POST /api/ai/generate-project-description`
pub async fn generate_project_description(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateProjectDescriptionRequest>, JsonRejection>,
) -> ApiResult<ProjectDescriptionResponse> {
    let Json(request) = payload?;

    info!(provider = ?request.provider, "Project description requested");

    state
        .generator
        .generate_project_description(&request.input, request.provider.as_deref())
        .await
        .map(ApiResponse::ok)
        .map_err(|e| ApiError::from_generation(TaskKind::ProjectDescription, &e))
}

/// `POST /api/ai/generate-task-description`
pub async fn generate_task_description(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateTaskDescriptionRequest>, JsonRejection>,
) -> ApiResult<TaskDescriptionResponse> {
    let Json(request) = payload?;

    let response_type: ResponseType = request
        .response_type
        .as_deref()
        .ok_or_else(|| {
            ApiError::bad_request(r#"responseType is required (must be "simple" or "detailed")"#)
        })?
        .parse()
        .map_err(|e: docgen::GenerationError| ApiError::bad_request(e.to_string()))?;

    info!(provider = ?request.provider, ?response_type, "Task description requested");

    state
        .generator
        .generate_task_description(response_type, &request.input, request.provider.as_deref())
        .await
        .map(ApiResponse::ok)
        .map_err(|e| ApiError::from_generation(response_type.task_kind(), &e))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
