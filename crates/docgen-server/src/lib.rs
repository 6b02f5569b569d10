#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! # Docgen Server
//!
//! HTTP boundary for the `docgen` generator: JSON routes for PRDs, project
//! descriptions and task descriptions, plus a health check.

pub mod api;
pub mod cli;
pub mod handlers;
pub mod logging;
pub mod server;

pub use api::{ApiError, ApiResponse};
pub use cli::Cli;
pub use server::{build_router, run_server, AppState};
