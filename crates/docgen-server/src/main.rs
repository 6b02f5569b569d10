//! docgen-server - HTTP API for document generation.
//!
//! # Environment Variables
//!
//! - `GROQ_API_KEY`, `OPENROUTER_API_KEY`, `GEMINI_API_KEY` - provider credentials
//! - `GROQ_MODEL`, `OPENROUTER_MODEL`, `GEMINI_MODEL` - model overrides
//! - `OPENROUTER_SITE_URL`, `OPENROUTER_SITE_NAME` - OpenRouter attribution
//! - `HOST`, `PORT`, `LOG_LEVEL`, `LOG_JSON` - server settings
//!
//! A `.env` file in the working directory is loaded first when present.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use docgen::{AiConfig, BackendRegistry, Generator};
use docgen_server::{logging, run_server, AppState, Cli};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so .env values feed the env fallbacks
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json)?;

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "Starting docgen server");

    let config = AiConfig::from_env();
    let registry = BackendRegistry::from_config(&config);
    if registry.configured_providers().is_empty() {
        warn!("No provider API keys configured; generation requests will fail");
    }

    let state = Arc::new(AppState::new(Generator::new(Arc::new(registry))));
    run_server(state, &cli.bind_addr()).await
}
