use std::sync::Arc;

use crate::{
    config::GeminiConfig,
    error::{Result, StoryboardError},
    gemini::GenerativeBackend,
    logger,
    models::{
        wire::{GenerateContentRequest, GenerationConfig, WireImageConfig},
        Credential, RenderRequest, RenderedImage, Resolution,
    },
    orchestrator::{classify, is_access_class, is_credential_rejection, with_deadline},
};

/// Renders one scene. Unlike plan calls this does not walk the whole tier list: a premium
/// render gets at most one retry on the standard image model.
#[derive(Clone)]
pub struct ImageClient {
    backend: Arc<dyn GenerativeBackend>,
    config: Arc<GeminiConfig>,
}

impl ImageClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: Arc<GeminiConfig>) -> Self {
        Self { backend, config }
    }

    pub async fn render(
        &self,
        api_key: Option<&str>,
        request: &RenderRequest,
    ) -> Result<RenderedImage> {
        let credential = Credential::resolve(api_key, self.config.api_key.as_deref())
            .ok_or(StoryboardError::CredentialMissing)?;

        let premium = self.config.image_tiers.premium();
        let standard = self.config.image_tiers.standard();

        if request.use_pro && premium != standard {
            match self
                .attempt(&credential, premium, request, Some(request.resolution))
                .await
            {
                Ok(image) => return Ok(image),
                Err(err) if is_access_class(&err) => {
                    log::warn!("{} unavailable ({}), retrying on {}", premium, err, standard);
                }
                Err(err) => return Err(err),
            }
        }

        // The standard tier does not take a resolution.
        let resolution = if request.use_pro && premium == standard {
            Some(request.resolution)
        } else {
            None
        };

        self.attempt(&credential, standard, request, resolution)
            .await
            .map_err(|err| {
                if is_credential_rejection(&err) {
                    StoryboardError::CredentialInvalid(err.to_string())
                } else {
                    err
                }
            })
    }

    async fn attempt(
        &self,
        credential: &Credential,
        model: &str,
        request: &RenderRequest,
        resolution: Option<Resolution>,
    ) -> Result<RenderedImage> {
        let payload = GenerateContentRequest::with_image(
            &request.reference.mime_type,
            &request.reference.data,
            request.prompt.clone(),
            Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".into(), "IMAGE".into()]),
                image_config: Some(WireImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str().to_string(),
                    image_size: resolution.map(|r| r.as_str().to_string()),
                }),
                ..Default::default()
            }),
        );

        let response = {
            let _timer = logger::timer(model);
            with_deadline(
                model,
                self.config.generation_timeout,
                self.backend.generate_content(credential, model, &payload),
            )
            .await
            .map_err(|err| classify::normalize(model, err))?
        };

        let image = response
            .first_inline_image()
            .ok_or_else(|| StoryboardError::GenerationEmpty {
                model: model.to_string(),
            })?;

        log::info!("Generated image with model: {}", model);
        Ok(RenderedImage {
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
            model: model.to_string(),
        })
    }
}
