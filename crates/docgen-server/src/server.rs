//! HTTP server.
//!
//! Provides REST API endpoints for:
//! - Health checks
//! - PRD generation
//! - Project description generation
//! - Task description generation

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use docgen::Generator;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;

/// Server state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    /// Generation orchestrator
    pub generator: Generator,
}

impl AppState {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/ai/generate-prd", post(handlers::generate_prd))
        .route(
            "/api/ai/generate-project-description",
            post(handlers::generate_project_description),
        )
        .route(
            "/api/ai/generate-task-description",
            post(handlers::generate_task_description),
        )
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn run_server(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Docgen server listening on {addr}");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
