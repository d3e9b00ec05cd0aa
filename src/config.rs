use std::env;
use std::time::Duration;

use crate::models::{ModelCategory, ModelInfo, ModelTierList};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub const PRO_TEXT_MODEL: &str = "gemini-3-pro-preview";
pub const FLASH_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const PRO_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const FLASH_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

pub const DEFAULT_VALIDATION_TIMEOUT_MS: u64 = 20_000;
pub const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Process-wide key used when a call does not supply one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_tiers: ModelTierList,
    pub image_tiers: ModelTierList,
    pub validation_timeout: Duration,
    pub generation_timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_tiers: ModelTierList::new([PRO_TEXT_MODEL, FLASH_TEXT_MODEL]),
            image_tiers: ModelTierList::new([PRO_IMAGE_MODEL, FLASH_IMAGE_MODEL]),
            validation_timeout: Duration::from_millis(DEFAULT_VALIDATION_TIMEOUT_MS),
            generation_timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty());
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let validation_timeout = env::var("STORYBOARD_VALIDATION_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(DEFAULT_VALIDATION_TIMEOUT_MS);
        let generation_timeout = env::var("STORYBOARD_GENERATION_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT_MS);

        GeminiConfig {
            api_key,
            base_url,
            validation_timeout: Duration::from_millis(validation_timeout),
            generation_timeout: Duration::from_millis(generation_timeout),
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_text_tiers(mut self, tiers: ModelTierList) -> Self {
        self.text_tiers = tiers;
        self
    }

    pub fn with_image_tiers(mut self, tiers: ModelTierList) -> Self {
        self.image_tiers = tiers;
        self
    }

    pub fn with_timeouts(mut self, validation: Duration, generation: Duration) -> Self {
        self.validation_timeout = validation;
        self.generation_timeout = generation;
        self
    }
}

pub fn supported_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            id: PRO_TEXT_MODEL.to_string(),
            name: "Gemini 3 Pro".to_string(),
            category: ModelCategory::Text,
            premium: true,
            description: "Scene planning and category suggestions, premium tier".to_string(),
        },
        ModelInfo {
            id: FLASH_TEXT_MODEL.to_string(),
            name: "Gemini 2.5 Flash".to_string(),
            category: ModelCategory::Text,
            premium: false,
            description: "Scene planning and category suggestions, standard tier".to_string(),
        },
        ModelInfo {
            id: PRO_IMAGE_MODEL.to_string(),
            name: "Gemini 3 Pro Image".to_string(),
            category: ModelCategory::Image,
            premium: true,
            description: "Scene rendering with 1K/2K/4K output".to_string(),
        },
        ModelInfo {
            id: FLASH_IMAGE_MODEL.to_string(),
            name: "Gemini 2.5 Flash Image".to_string(),
            category: ModelCategory::Image,
            premium: false,
            description: "Scene rendering at the default resolution".to_string(),
        },
    ]
}
