use std::sync::Arc;

use crate::{
    config::GeminiConfig,
    error::{Result, StoryboardError},
    gemini::GenerativeBackend,
    models::{
        wire::{GenerateContentRequest, GenerationConfig},
        CategorySuggestions, Credential, OutputContract, PlanRequest, ReferenceImage, StoryMode,
        StoryboardPlan,
    },
    orchestrator::{run_tiered, TierOutcome},
    prompts,
};

/// Schema-constrained calls against the text tiers: category ideas and storyboard plans.
#[derive(Clone)]
pub struct TextClient {
    backend: Arc<dyn GenerativeBackend>,
    config: Arc<GeminiConfig>,
}

impl TextClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>, config: Arc<GeminiConfig>) -> Self {
        Self { backend, config }
    }

    /// Falls back to [`CategorySuggestions::defaults`] when the model answers with nothing.
    pub async fn suggest_categories(
        &self,
        api_key: Option<&str>,
        reference: &ReferenceImage,
        mode: StoryMode,
    ) -> Result<Vec<String>> {
        let credential = self.credential(api_key)?;
        let contract = prompts::category_contract();
        let outcome = self
            .generate_structured(
                &credential,
                reference,
                prompts::category_instruction(mode),
                &contract,
            )
            .await?;

        let Some(text) = outcome.value else {
            log::warn!("{} suggested no categories, using defaults", outcome.model);
            return Ok(CategorySuggestions::defaults());
        };

        let suggestions: CategorySuggestions = contract.decode(&text)?;
        let categories: Vec<String> = suggestions
            .categories
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        if categories.is_empty() {
            log::warn!("{} suggested no categories, using defaults", outcome.model);
            return Ok(CategorySuggestions::defaults());
        }

        Ok(categories)
    }

    pub async fn generate_plan(
        &self,
        api_key: Option<&str>,
        request: &PlanRequest,
    ) -> Result<StoryboardPlan> {
        let credential = self.credential(api_key)?;
        let contract = prompts::plan_contract();
        let TierOutcome { value, model, .. } = self
            .generate_structured(
                &credential,
                &request.reference,
                prompts::plan_instruction(request),
                &contract,
            )
            .await?;

        let text = value.ok_or(StoryboardError::GenerationEmpty {
            model: model.clone(),
        })?;
        let plan: StoryboardPlan = contract.decode(&text)?;
        let plan = plan.validate()?;

        log::info!(
            "{} planned {} scenes ({} / {})",
            model,
            plan.angles.len(),
            plan.resolution.as_str(),
            plan.aspect_ratio.as_str()
        );
        Ok(plan)
    }

    fn credential(&self, api_key: Option<&str>) -> Result<Credential> {
        Credential::resolve(api_key, self.config.api_key.as_deref())
            .ok_or(StoryboardError::CredentialMissing)
    }

    async fn generate_structured(
        &self,
        credential: &Credential,
        reference: &ReferenceImage,
        instruction: String,
        contract: &OutputContract,
    ) -> Result<TierOutcome<Option<String>>> {
        let request = GenerateContentRequest::with_image(
            &reference.mime_type,
            &reference.data,
            instruction,
            Some(GenerationConfig {
                response_mime_type: Some(contract.mime_type.clone()),
                response_schema: Some(contract.schema.clone()),
                ..Default::default()
            }),
        );
        let backend = &self.backend;
        let request = &request;

        run_tiered(
            &self.config.text_tiers,
            self.config.generation_timeout,
            |model| async move {
                backend
                    .generate_content(credential, &model, request)
                    .await
                    .map(|response| response.text())
            },
        )
        .await
    }
}
