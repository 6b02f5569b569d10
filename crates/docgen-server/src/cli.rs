//! Command-line and environment settings for the server.

use clap::Parser;

/// HTTP API for PRD, project and task description generation.
///
/// Provider credentials are read from the environment (`GROQ_API_KEY`,
/// `OPENROUTER_API_KEY`, `GEMINI_API_KEY` and friends).
#[derive(Debug, Clone, Parser)]
#[command(name = "docgen-server")]
#[command(version)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Default log level when `RUST_LOG` is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["docgen-server"]).unwrap();
        assert_eq!(cli.port, 3000);
        assert_eq!(cli.log_level, "info");
        assert!(!cli.log_json);
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::try_parse_from([
            "docgen-server",
            "--host",
            "127.0.0.1",
            "-p",
            "8080",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(cli.bind_addr(), "127.0.0.1:8080");
        assert!(cli.log_json);
    }
}
