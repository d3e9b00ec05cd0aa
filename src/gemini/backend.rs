use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    error::{Result, StoryboardError},
    models::{
        wire::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse},
        Credential,
    },
};

/// One `generateContent` round trip. Implementations must not retry or time out on their own;
/// both are decided by the orchestrator.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("storyboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoryboardError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeBackend for HttpBackend {
    async fn generate_content(
        &self,
        credential: &Credential,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        log::info!("Invoking model: {}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Request to {} failed before a response: {}", model, e);
                StoryboardError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoryboardError::Transport(e.to_string()))?;

        if !status.is_success() {
            let err = service_error(status, &body);
            log::error!("{} rejected the request: {}", model, err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            StoryboardError::MalformedResponse(format!("unreadable response from {}: {}", model, e))
        })
    }
}

/// Folds the service's status name into the message so substring classification sees it.
fn service_error(status: StatusCode, body: &str) -> StoryboardError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let error = envelope.error;
            let message = match error.status {
                Some(name) if !error.message.contains(&name) => {
                    format!("{} ({})", error.message, name)
                }
                _ => error.message,
            };
            StoryboardError::Service {
                status: error.code.unwrap_or(status.as_u16()),
                message,
            }
        }
        Err(_) => {
            let text = body.trim();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                text.to_string()
            };
            StoryboardError::Service {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::is_access_class;

    #[test]
    fn test_endpoint_layout() {
        let backend = HttpBackend::new("http://localhost:8080/").unwrap();
        assert_eq!(
            backend.endpoint("gemini-2.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_permission_denied_envelope() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have access to this model.","status":"PERMISSION_DENIED"}}"#;
        let err = service_error(StatusCode::FORBIDDEN, body);
        assert_eq!(
            err.to_string(),
            "Service error (403): The caller does not have access to this model. (PERMISSION_DENIED)"
        );
        assert!(is_access_class(&err));
    }

    #[test]
    fn test_bad_request_is_hard_failure() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let err = service_error(StatusCode::BAD_REQUEST, body);
        assert!(!is_access_class(&err));
    }

    #[test]
    fn test_non_json_error_body() {
        let err = service_error(StatusCode::NOT_FOUND, "");
        assert_eq!(err.to_string(), "Service error (404): Not Found");
        assert!(is_access_class(&err));

        let err = service_error(StatusCode::BAD_GATEWAY, "upstream hiccup\n");
        assert_eq!(err.to_string(), "Service error (502): upstream hiccup");
    }
}
