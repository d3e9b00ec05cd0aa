use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, StoryboardError},
    models::common::ReferenceImage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Tall,
        AspectRatio::Wide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }
}

/// Output size tag. Only the premium image tier accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Resolution::OneK, Resolution::TwoK, Resolution::FourK];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneK => "1K",
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub prompt: String,
    pub reference: ReferenceImage,
    pub use_pro: bool,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
}

impl RenderRequest {
    pub fn new(prompt: impl Into<String>, reference: ReferenceImage) -> Self {
        Self {
            prompt: prompt.into(),
            reference,
            use_pro: false,
            aspect_ratio: AspectRatio::Wide,
            resolution: Resolution::OneK,
        }
    }

    pub fn with_pro(mut self, use_pro: bool) -> Self {
        self.use_pro = use_pro;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedImage {
    pub mime_type: String,
    pub data: String, // Base64 encoded
    pub model: String,
}

impl RenderedImage {
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| StoryboardError::MalformedResponse(format!("invalid image data: {}", e)))
    }

    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serde_names() {
        for ratio in AspectRatio::ALL {
            assert_eq!(
                serde_json::to_value(ratio).unwrap(),
                serde_json::Value::String(ratio.as_str().to_string())
            );
        }
        for resolution in Resolution::ALL {
            assert_eq!(
                serde_json::to_value(resolution).unwrap(),
                serde_json::Value::String(resolution.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_rendered_image_decode() {
        let image = RenderedImage {
            mime_type: "image/jpeg".into(),
            data: "aGVsbG8=".into(),
            model: "gemini-2.5-flash-image".into(),
        };
        assert_eq!(image.decode().unwrap(), b"hello");
        assert_eq!(image.file_extension(), "jpg");

        let broken = RenderedImage {
            data: "not base64!".into(),
            ..image
        };
        assert!(matches!(
            broken.decode(),
            Err(StoryboardError::MalformedResponse(_))
        ));
    }
}
