//! Backend integration.
//!
//! This module provides:
//! - The backend client abstraction and its capability sets
//! - Groq, OpenRouter and Gemini clients
//! - Output strategy selection
//! - Prompt templates and response schemas
//! - The backend registry

pub mod prompts;
pub mod provider;
pub mod registry;
pub mod schemas;
pub mod strategy;

// Provider implementations
mod chat;
pub mod gemini;
pub mod groq;
pub mod openrouter;

// Re-exports
pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use openrouter::OpenRouterClient;
pub use prompts::{PromptManager, PromptTemplate};
pub use provider::{strip_code_fences, BackendClient, Capabilities, Provider};
pub use registry::{unsupported_provider_message, BackendRegistry, ProviderInfo};
pub use schemas::Schema;
pub use strategy::OutputStrategy;
