//! Error types for document generation.

use thiserror::Error;

use crate::ai::Provider;

/// Errors that can occur while generating a document.
///
/// Every failure propagates to the caller as one of these variants. None of
/// them trigger a retry or a fallback to a different provider.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request was rejected before any network activity.
    #[error("{0}")]
    Validation(String),

    /// A provider was selected whose client could not be constructed.
    #[error("{provider} is not configured: {reason}")]
    Config {
        /// Provider that was selected.
        provider: Provider,
        /// Why the client could not be built.
        reason: String,
    },

    /// The backend was unreachable or answered with a non-success status.
    #[error("{provider} API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport {
        /// Provider that was called.
        provider: Provider,
        /// HTTP status, absent for connection-level failures.
        status: Option<u16>,
        /// Status text and response body, or the connection error.
        message: String,
    },

    /// The backend answered but the reply was unusable.
    #[error("{provider} returned an unusable response: {reason}")]
    Decode {
        /// Provider that was called.
        provider: Provider,
        /// What was wrong with the reply.
        reason: String,
    },

    /// A prompt template failed to register or render.
    #[error("Prompt template error: {0}")]
    Template(String),
}

impl GenerationError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decode error.
    pub fn decode(provider: Provider, reason: impl Into<String>) -> Self {
        Self::Decode {
            provider,
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<handlebars::RenderError> for GenerationError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for GenerationError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

/// Result type for generation operations.
pub type GenResult<T> = Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_message_includes_status() {
        let err = GenerationError::Transport {
            provider: Provider::Groq,
            status: Some(500),
            message: "Internal Server Error - boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "groq API error (500): Internal Server Error - boom"
        );
    }

    #[test]
    fn test_transport_message_without_status() {
        let err = GenerationError::Transport {
            provider: Provider::Gemini,
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "gemini API error: connection refused");
    }

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(GenerationError::validation("bad").is_client_error());
        assert!(!GenerationError::decode(Provider::Groq, "empty").is_client_error());
        assert!(!GenerationError::Template("x".to_string()).is_client_error());
    }
}
