//! Substring-based failure classification.
//!
//! The service only reports access problems in free-form messages, so this is
//! the single place that decides what counts as one.

use crate::error::StoryboardError;

const ACCESS_MARKERS: [&str; 5] = [
    "entity not found",
    "not found",
    "permission",
    "denied",
    "not authorized",
];

const CREDENTIAL_REJECTION_MARKER: &str = "entity was not found";

pub fn message_indicates_access(message: &str) -> bool {
    let message = message.to_lowercase();
    ACCESS_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Timeouts and access denials move a request to the next tier; everything else stops it.
pub fn is_access_class(err: &StoryboardError) -> bool {
    match err {
        StoryboardError::Timeout { .. } | StoryboardError::AccessDenied { .. } => true,
        StoryboardError::Service { message, .. } | StoryboardError::Transport(message) => {
            message_indicates_access(message)
        }
        _ => false,
    }
}

/// Re-labels an access-class service failure as [`StoryboardError::AccessDenied`].
pub fn normalize(model: &str, err: StoryboardError) -> StoryboardError {
    match err {
        StoryboardError::Service { message, .. } | StoryboardError::Transport(message)
            if message_indicates_access(&message) =>
        {
            StoryboardError::AccessDenied {
                model: model.to_string(),
                message,
            }
        }
        other => other,
    }
}

/// True when the service says the key itself does not exist.
pub fn is_credential_rejection(err: &StoryboardError) -> bool {
    err.service_message()
        .map(|message| message.to_lowercase().contains(CREDENTIAL_REJECTION_MARKER))
        .unwrap_or(false)
}
