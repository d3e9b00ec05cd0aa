//! Instructions and response schemas sent to the text tier.
//!
//! Identity lock: every scene prompt the model writes must open with
//! [`IDENTITY_ANCHOR`]. The service's compliance cannot be checked here; the
//! instruction is the only enforcement.

use serde_json::{json, Value};

use crate::models::{
    AspectRatio, OutputContract, PlanRequest, Resolution, StoryMode, ZoomDirection,
    DEFAULT_CATEGORIES, SCENE_COUNT,
};

pub const IDENTITY_ANCHOR: &str = "The exact same person in the reference image";

const SUBJECT_RULES: &str = "First study the reference photo and write a precise, reusable \
description of the person: face shape, eyes, skin tone, hairstyle and hair color, body type, \
and every visible clothing item and accessory. Store it in `subject`. Describe the overall \
photographic look (lighting, color grading, lens feel) in `style`.";

pub fn category_instruction(mode: StoryMode) -> String {
    let focus = match mode {
        StoryMode::Narrative => "short story themes this person could star in",
        StoryMode::CameraAngles => "photo-shoot concepts that would suit this person",
        StoryMode::ZoomSequence => "settings that would make a striking continuous zoom shot",
    };

    format!(
        "Look at the person in the reference image and suggest 5 {}. \
Each label must be 1 to 4 words, in English, with no numbering. \
Return them in `categories`, best fit first.",
        focus
    )
}

pub fn plan_instruction(request: &PlanRequest) -> String {
    let mut instruction = String::new();

    instruction.push_str(&format!(
        "You are a storyboard artist. Create exactly {} scenes featuring the person in the reference image.\n\n",
        SCENE_COUNT
    ));
    instruction.push_str(SUBJECT_RULES);
    instruction.push_str("\n\n");
    instruction.push_str(&mode_brief(request));
    instruction.push_str("\n\n");
    instruction.push_str(&format!(
        "Scene rules:\n\
- Every `prompt` MUST begin with \"{anchor}, with identical face, hair, and attire,\" and then describe the scene.\n\
- Repeat the key details of `subject` inside each prompt so it can be rendered on its own.\n\
- `promptKo` is a natural Korean translation of `prompt`, starting with \"참조 이미지와 완전히 동일한 인물\".\n\
- `name` is a short English title for the scene.\n\
- Keep the scenes in narrative order.\n\n",
        anchor = IDENTITY_ANCHOR
    ));
    instruction.push_str(&format!(
        "Choose `resolution` from {} and `aspectRatio` from {} to suit the scenes.",
        tag_list(Resolution::ALL.iter().map(|r| r.as_str())),
        tag_list(AspectRatio::ALL.iter().map(|a| a.as_str())),
    ));

    instruction
}

fn mode_brief(request: &PlanRequest) -> String {
    match request.mode {
        StoryMode::Narrative => {
            let category = request
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_CATEGORIES[0]);
            format!(
                "Mode: narrative. Tell one coherent short story in the \"{}\" category, \
one story beat per scene, with a clear beginning, turning point, and ending.",
                category
            )
        }
        StoryMode::CameraAngles => "Mode: camera angles. Show one single moment from nine different \
camera setups (e.g. extreme close-up, low angle, over-the-shoulder, bird's-eye, profile). \
Keep pose, setting, and lighting continuous across scenes."
            .to_string(),
        StoryMode::ZoomSequence => {
            let direction = match request.zoom {
                ZoomDirection::In => {
                    "zoom in: start from a very wide establishing shot and move step by step \
closer until the last scene is an extreme close-up of the face"
                }
                ZoomDirection::Out => {
                    "zoom out: start from an extreme close-up of the face and pull back step by \
step until the last scene is a very wide establishing shot"
                }
            };
            format!(
                "Mode: continuous zoom. One unbroken camera move, {}. \
The person, pose, and setting stay fixed; only framing changes.",
                direction
            )
        }
    }
}

fn tag_list<'a>(tags: impl Iterator<Item = &'a str>) -> String {
    tags.map(|t| format!("\"{}\"", t)).collect::<Vec<_>>().join(", ")
}

pub fn category_contract() -> OutputContract {
    OutputContract::json(json!({
        "type": "OBJECT",
        "properties": {
            "categories": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["categories"]
    }))
}

pub fn plan_contract() -> OutputContract {
    OutputContract::json(json!({
        "type": "OBJECT",
        "properties": {
            "subject": { "type": "STRING" },
            "style": { "type": "STRING" },
            "resolution": {
                "type": "STRING",
                "enum": enum_values(Resolution::ALL.iter().map(|r| r.as_str()))
            },
            "aspectRatio": {
                "type": "STRING",
                "enum": enum_values(AspectRatio::ALL.iter().map(|a| a.as_str()))
            },
            "angles": {
                "type": "ARRAY",
                "minItems": SCENE_COUNT,
                "maxItems": SCENE_COUNT,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "prompt": { "type": "STRING" },
                        "promptKo": { "type": "STRING" }
                    },
                    "required": ["name", "prompt", "promptKo"]
                }
            }
        },
        "required": ["subject", "style", "resolution", "aspectRatio", "angles"]
    }))
}

fn enum_values<'a>(tags: impl Iterator<Item = &'a str>) -> Value {
    Value::Array(tags.map(|t| Value::String(t.to_string())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReferenceImage;

    fn request(mode: StoryMode) -> PlanRequest {
        PlanRequest::new(ReferenceImage::from_base64("image/png", "AAAA"), mode)
    }

    #[test]
    fn test_every_mode_carries_identity_anchor() {
        for mode in [
            StoryMode::Narrative,
            StoryMode::CameraAngles,
            StoryMode::ZoomSequence,
        ] {
            let instruction = plan_instruction(&request(mode));
            assert!(instruction.contains(IDENTITY_ANCHOR), "{:?}", mode);
            assert!(instruction.contains("exactly 9 scenes"));
        }
    }

    #[test]
    fn test_narrative_uses_category() {
        let instruction = plan_instruction(&request(StoryMode::Narrative).with_category("Noir Mystery"));
        assert!(instruction.contains("\"Noir Mystery\" category"));

        let fallback = plan_instruction(&request(StoryMode::Narrative).with_category("   "));
        assert!(fallback.contains("\"Daily Life\" category"));
    }

    #[test]
    fn test_zoom_direction_only_matters_for_zoom_mode() {
        let zoom_in = plan_instruction(&request(StoryMode::ZoomSequence).with_zoom(ZoomDirection::In));
        let zoom_out =
            plan_instruction(&request(StoryMode::ZoomSequence).with_zoom(ZoomDirection::Out));
        assert!(zoom_in.contains("zoom in:"));
        assert!(zoom_out.contains("zoom out:"));

        let angles_in = plan_instruction(&request(StoryMode::CameraAngles).with_zoom(ZoomDirection::In));
        let angles_out =
            plan_instruction(&request(StoryMode::CameraAngles).with_zoom(ZoomDirection::Out));
        assert_eq!(angles_in, angles_out);
    }

    #[test]
    fn test_plan_schema_pins_scene_count_and_tags() {
        let contract = plan_contract();
        assert_eq!(contract.mime_type, "application/json");
        let angles = &contract.schema["properties"]["angles"];
        assert_eq!(angles["minItems"], SCENE_COUNT);
        assert_eq!(angles["maxItems"], SCENE_COUNT);
        assert_eq!(
            contract.schema["properties"]["aspectRatio"]["enum"],
            json!(["1:1", "3:4", "4:3", "9:16", "16:9"])
        );
        assert_eq!(
            contract.schema["properties"]["resolution"]["enum"],
            json!(["1K", "2K", "4K"])
        );
    }

    #[test]
    fn test_category_instruction_varies_by_mode() {
        assert_ne!(
            category_instruction(StoryMode::Narrative),
            category_instruction(StoryMode::ZoomSequence)
        );
        assert_eq!(
            category_contract().schema["required"],
            json!(["categories"])
        );
    }
}
