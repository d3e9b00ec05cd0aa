pub mod backend;
pub mod image_client;
pub mod key_validator;
pub mod text_client;

#[cfg(test)]
pub(crate) mod scripted;

use crate::{
    config::GeminiConfig,
    error::{Result, StoryboardError},
    models::{PlanRequest, ReferenceImage, RenderRequest, RenderedImage, StoryMode, StoryboardPlan},
};
use std::sync::Arc;

pub use backend::{GenerativeBackend, HttpBackend};
pub use image_client::ImageClient;
pub use key_validator::{KeyValidator, ValidationResult};
pub use text_client::TextClient;

/// Entry point bundling the three capabilities over one backend.
///
/// Holds no per-call state. The API key is passed to each call or taken from
/// [`GeminiConfig::api_key`].
#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
    key_validator: KeyValidator,
    config: Arc<GeminiConfig>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let backend = HttpBackend::new(config.base_url.clone())?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    pub fn with_backend(config: GeminiConfig, backend: Arc<dyn GenerativeBackend>) -> Self {
        let config = Arc::new(config);

        Self {
            text_client: TextClient::new(backend.clone(), config.clone()),
            image_client: ImageClient::new(backend.clone(), config.clone()),
            key_validator: KeyValidator::new(backend, config.clone()),
            config,
        }
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn validator(&self) -> &KeyValidator {
        &self.key_validator
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub async fn validate_key(&self, api_key: Option<&str>) -> ValidationResult {
        self.key_validator.validate(api_key).await
    }

    pub async fn suggest_categories(
        &self,
        api_key: Option<&str>,
        reference: &ReferenceImage,
        mode: StoryMode,
    ) -> Result<Vec<String>> {
        self.text_client
            .suggest_categories(api_key, reference, mode)
            .await
    }

    pub async fn generate_plan(
        &self,
        api_key: Option<&str>,
        request: &PlanRequest,
    ) -> Result<StoryboardPlan> {
        self.text_client.generate_plan(api_key, request).await
    }

    pub async fn render(
        &self,
        api_key: Option<&str>,
        request: &RenderRequest,
    ) -> Result<RenderedImage> {
        self.image_client.render(api_key, request).await
    }

    /// Renders every scene of `plan` one after another, in order.
    ///
    /// Stops at the first failure; scenes rendered so far are returned alongside the error.
    pub async fn render_all(
        &self,
        api_key: Option<&str>,
        plan: &StoryboardPlan,
        reference: &ReferenceImage,
        use_pro: bool,
    ) -> (Vec<RenderedImage>, Option<StoryboardError>) {
        let mut images = Vec::with_capacity(plan.angles.len());

        for (index, angle) in plan.angles.iter().enumerate() {
            log::info!(
                "Rendering scene {}/{}: {}",
                index + 1,
                plan.angles.len(),
                angle.name
            );
            let request = RenderRequest::new(angle.prompt.clone(), reference.clone())
                .with_pro(use_pro)
                .with_aspect_ratio(plan.aspect_ratio)
                .with_resolution(plan.resolution);

            match self.render(api_key, &request).await {
                Ok(image) => images.push(image),
                Err(err) => {
                    log::error!("Scene {} failed: {}", index + 1, err);
                    return (images, Some(err));
                }
            }
        }

        (images, None)
    }
}
