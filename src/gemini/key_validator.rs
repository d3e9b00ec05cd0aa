use std::sync::Arc;

use serde::Serialize;

use crate::{
    config::GeminiConfig,
    error::{Result, StoryboardError},
    gemini::GenerativeBackend,
    models::{
        wire::{GenerateContentRequest, GenerationConfig},
        Credential,
    },
    orchestrator::{is_access_class, with_deadline},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub pro_available: bool,
}

impl ValidationResult {
    pub const INVALID: ValidationResult = ValidationResult {
        valid: false,
        pro_available: false,
    };
}

#[derive(Clone)]
pub struct KeyValidator {
    backend: Arc<dyn GenerativeBackend>,
    config: Arc<GeminiConfig>,
}

impl KeyValidator {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: Arc<GeminiConfig>) -> Self {
        Self { backend, config }
    }

    /// Probes the premium text tier, then the standard one. Never fails; problems are logged
    /// and reported as an invalid key.
    pub async fn validate(&self, api_key: Option<&str>) -> ValidationResult {
        let Some(credential) = Credential::resolve(api_key, self.config.api_key.as_deref()) else {
            log::warn!("No API key to validate");
            return ValidationResult::INVALID;
        };

        let premium = self.config.text_tiers.premium();
        match self.probe(&credential, premium).await {
            Ok(()) => {
                log::info!("API key valid, {} available", premium);
                ValidationResult {
                    valid: true,
                    pro_available: true,
                }
            }
            Err(err) if is_access_class(&err) => self.probe_standard(&credential, &err).await,
            Err(err) => {
                log::error!("API key validation failed on {}: {}", premium, err);
                ValidationResult::INVALID
            }
        }
    }

    async fn probe_standard(
        &self,
        credential: &Credential,
        premium_error: &StoryboardError,
    ) -> ValidationResult {
        let Some(standard) = self.config.text_tiers.fallback() else {
            log::error!("API key rejected and no standard tier to fall back to: {}", premium_error);
            return ValidationResult::INVALID;
        };

        log::warn!("Premium tier unavailable ({}), probing {}", premium_error, standard);
        match self.probe(credential, standard).await {
            Ok(()) => {
                log::info!("API key valid, standard tier only");
                ValidationResult {
                    valid: true,
                    pro_available: false,
                }
            }
            Err(err) => {
                log::error!("API key validation failed on {}: {}", standard, err);
                ValidationResult::INVALID
            }
        }
    }

    async fn probe(&self, credential: &Credential, model: &str) -> Result<()> {
        let request = GenerateContentRequest::text_only(
            "ping",
            Some(GenerationConfig {
                max_output_tokens: Some(1),
                ..Default::default()
            }),
        );

        with_deadline(
            model,
            self.config.validation_timeout,
            self.backend.generate_content(credential, model, &request),
        )
        .await
        .map(|_| ())
    }
}
