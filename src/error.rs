use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryboardError {
    #[error("No API key supplied and no default key configured")]
    CredentialMissing,

    #[error("Request to {model} timed out after {}ms", .after.as_millis())]
    Timeout { model: String, after: Duration },

    #[error("Access denied for {model}: {message}")]
    AccessDenied { model: String, message: String },

    #[error("{model} returned no usable content")]
    GenerationEmpty { model: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("API key rejected: {0}")]
    CredentialInvalid(String),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable, caller-facing classification of a [`StoryboardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CredentialMissing,
    Timeout,
    AccessDenied,
    GenerationEmpty,
    MalformedResponse,
    CredentialInvalid,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::CredentialMissing => "CREDENTIAL_MISSING",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::AccessDenied => "ACCESS_DENIED",
            ErrorKind::GenerationEmpty => "GENERATION_EMPTY",
            ErrorKind::MalformedResponse => "MALFORMED_RESPONSE",
            ErrorKind::CredentialInvalid => "CREDENTIAL_INVALID",
            ErrorKind::Other => "OTHER",
        }
    }
}

impl StoryboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoryboardError::CredentialMissing => ErrorKind::CredentialMissing,
            StoryboardError::Timeout { .. } => ErrorKind::Timeout,
            StoryboardError::AccessDenied { .. } => ErrorKind::AccessDenied,
            StoryboardError::GenerationEmpty { .. } => ErrorKind::GenerationEmpty,
            StoryboardError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            StoryboardError::CredentialInvalid(_) => ErrorKind::CredentialInvalid,
            StoryboardError::Service { .. }
            | StoryboardError::Transport(_)
            | StoryboardError::Config(_) => ErrorKind::Other,
        }
    }

    /// Human-readable message the service (or transport) attached to the failure, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            StoryboardError::AccessDenied { message, .. }
            | StoryboardError::Service { message, .. } => Some(message),
            StoryboardError::Transport(message) => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoryboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(
            StoryboardError::CredentialMissing.kind().as_str(),
            "CREDENTIAL_MISSING"
        );
        let timeout = StoryboardError::Timeout {
            model: "gemini-2.5-flash".into(),
            after: Duration::from_millis(1500),
        };
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert_eq!(
            timeout.to_string(),
            "Request to gemini-2.5-flash timed out after 1500ms"
        );
        let service = StoryboardError::Service {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(service.kind(), ErrorKind::Other);
        assert_eq!(service.service_message(), Some("boom"));
    }
}
