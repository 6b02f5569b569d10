#![recursion_limit = "256"]
#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]

//! # Docgen
//!
//! Multi-provider generation of product requirements documents, project
//! descriptions and task descriptions.
//!
//! This crate provides:
//! - Backend clients for Groq, OpenRouter and Gemini behind one trait
//! - Output strategy selection from each backend's capabilities
//! - Handlebars prompt templates and JSON response schemas
//! - Response normalization with schema-driven repair
//! - The [`Generator`] that ties them together per request
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docgen::{AiConfig, BackendRegistry, Generator, ProjectDescriptionInput};
//!
//! let registry = BackendRegistry::from_config(&AiConfig::from_env());
//! let generator = Generator::new(Arc::new(registry));
//!
//! let input = ProjectDescriptionInput {
//!     simple_prompt: Some("A habit tracker for students".to_string()),
//!     ..Default::default()
//! };
//! let result = generator.generate_project_description(&input, None).await?;
//! println!("{}", result.description);
//! ```

// Error types
pub mod errors;

// Provider configuration
pub mod config;

// Task kinds and inputs
pub mod task;

// Backend integration
pub mod ai;

// Response normalization
pub mod normalize;

// Generated documents
pub mod documents;

// Orchestration
pub mod generator;

// Re-export key types for convenience
pub use ai::{
    BackendClient, BackendRegistry, Capabilities, OutputStrategy, PromptManager, Provider,
    ProviderInfo,
};
pub use config::AiConfig;
pub use documents::{
    PrdDocument, PrdResponse, ProjectDescriptionResponse, TaskDescription,
    TaskDescriptionDetailed, TaskDescriptionResponse,
};
pub use errors::{GenResult, GenerationError};
pub use generator::Generator;
pub use task::{
    ProductInput, ProjectDescriptionInput, ProjectInputMode, ResponseType, TaskDescriptionInput,
    TaskKind, TechStackInput, TechnicalRequirements,
};
