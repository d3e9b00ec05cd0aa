use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Result, StoryboardError},
    models::{
        common::ReferenceImage,
        image::{AspectRatio, Resolution},
    },
};

/// Number of scenes every storyboard plan carries.
pub const SCENE_COUNT: usize = 9;

/// Returned when a category suggestion call comes back empty.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Daily Life",
    "Travel Adventure",
    "Romance",
    "Career Journey",
    "Fantasy Quest",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryMode {
    /// Nine beats of a short story within a category.
    Narrative,
    /// One moment seen from nine camera setups.
    CameraAngles,
    /// Nine steps of one continuous zoom.
    ZoomSequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    #[default]
    In,
    Out,
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub reference: ReferenceImage,
    pub mode: StoryMode,
    pub category: Option<String>,
    /// Only read in [`StoryMode::ZoomSequence`].
    pub zoom: ZoomDirection,
}

impl PlanRequest {
    pub fn new(reference: ReferenceImage, mode: StoryMode) -> Self {
        Self {
            reference,
            mode,
            category: None,
            zoom: ZoomDirection::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_zoom(mut self, zoom: ZoomDirection) -> Self {
        self.zoom = zoom;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAngle {
    pub name: String,
    pub prompt: String,
    pub prompt_ko: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardPlan {
    pub subject: String,
    pub style: String,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
    pub angles: Vec<SceneAngle>,
}

impl StoryboardPlan {
    /// Rejects plans that decoded but do not have exactly nine complete scenes.
    pub fn validate(self) -> Result<Self> {
        if self.angles.len() != SCENE_COUNT {
            return Err(StoryboardError::MalformedResponse(format!(
                "expected {} scenes, got {}",
                SCENE_COUNT,
                self.angles.len()
            )));
        }

        if let Some(index) = self.angles.iter().position(|angle| {
            angle.name.trim().is_empty()
                || angle.prompt.trim().is_empty()
                || angle.prompt_ko.trim().is_empty()
        }) {
            return Err(StoryboardError::MalformedResponse(format!(
                "scene {} has an empty field",
                index + 1
            )));
        }

        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestions {
    pub categories: Vec<String>,
}

impl CategorySuggestions {
    pub fn defaults() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }
}

/// Shape the service is asked to produce, and the decoder for what comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputContract {
    pub mime_type: String,
    pub schema: Value,
}

impl OutputContract {
    pub fn json(schema: Value) -> Self {
        Self {
            mime_type: "application/json".to_string(),
            schema,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T> {
        serde_json::from_str(strip_code_fence(text))
            .map_err(|e| StoryboardError::MalformedResponse(e.to_string()))
    }
}

// Models occasionally wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let body = rest.strip_prefix("json").unwrap_or(rest);
            body.strip_suffix("```").unwrap_or(body).trim()
        }
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn angle(i: usize) -> Value {
        json!({
            "name": format!("Scene {}", i),
            "prompt": format!("The exact same person in the reference image, scene {}", i),
            "promptKo": format!("참조 이미지와 동일한 인물, 장면 {}", i)
        })
    }

    fn plan_json(count: usize) -> String {
        json!({
            "subject": "young woman, short black bob, denim jacket",
            "style": "soft film photography",
            "resolution": "2K",
            "aspectRatio": "16:9",
            "angles": (1..=count).map(angle).collect::<Vec<_>>()
        })
        .to_string()
    }

    #[test]
    fn test_decode_valid_plan() {
        let contract = OutputContract::json(json!({}));
        let plan: StoryboardPlan = contract.decode(&plan_json(9)).unwrap();
        let plan = plan.validate().unwrap();
        assert_eq!(plan.angles.len(), SCENE_COUNT);
        assert_eq!(plan.resolution, Resolution::TwoK);
        assert_eq!(plan.aspect_ratio, AspectRatio::Wide);
        assert_eq!(plan.angles[0].name, "Scene 1");
    }

    #[test]
    fn test_wrong_scene_count_is_malformed() {
        let contract = OutputContract::json(json!({}));
        let plan: StoryboardPlan = contract.decode(&plan_json(8)).unwrap();
        let err = plan.validate().unwrap_err();
        assert!(matches!(err, StoryboardError::MalformedResponse(_)));
    }

    #[test]
    fn test_empty_field_is_malformed() {
        let contract = OutputContract::json(json!({}));
        let mut plan: StoryboardPlan = contract.decode(&plan_json(9)).unwrap();
        plan.angles[4].prompt_ko = " ".into();
        let err = plan.validate().unwrap_err();
        assert_eq!(err.to_string(), "Malformed response: scene 5 has an empty field");
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let contract = OutputContract::json(json!({}));
        let result: Result<StoryboardPlan> = contract.decode("I cannot help with that");
        assert!(matches!(result, Err(StoryboardError::MalformedResponse(_))));

        let unknown_ratio = plan_json(9).replace("16:9", "21:9");
        let result: Result<StoryboardPlan> = contract.decode(&unknown_ratio);
        assert!(matches!(result, Err(StoryboardError::MalformedResponse(_))));
    }

    #[test]
    fn test_decode_strips_code_fence() {
        let contract = OutputContract::json(json!({}));
        let fenced = "```json\n{\"categories\": [\"Noir\", \"Sports\"]}\n```";
        let suggestions: CategorySuggestions = contract.decode(fenced).unwrap();
        assert_eq!(suggestions.categories, vec!["Noir", "Sports"]);
    }

    #[test]
    fn test_default_categories() {
        let defaults = CategorySuggestions::defaults();
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[0], "Daily Life");
    }
}
