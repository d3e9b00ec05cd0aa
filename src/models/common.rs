use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub category: ModelCategory,
    pub premium: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Text,
    Image,
}

/// Ordered model preference for one capability class, most capable first.
///
/// The order is the demotion path and never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTierList(Vec<String>);

impl ModelTierList {
    /// Panics if `models` is empty: a tier list without tiers is a programming error.
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models: Vec<String> = models.into_iter().map(Into::into).collect();
        assert!(
            !models.is_empty(),
            "model tier list must contain at least one model"
        );
        Self(models)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn premium(&self) -> &str {
        &self.0[0]
    }

    /// Cheapest tier; equal to [`premium`](Self::premium) for a single-entry list.
    pub fn standard(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// Next tier below the premium one, if there is one.
    pub fn fallback(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

/// Opaque API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Picks the explicitly supplied key, else the process default. Blank strings count as absent.
    pub fn resolve(explicit: Option<&str>, default: Option<&str>) -> Option<Self> {
        explicit
            .filter(|key| !key.trim().is_empty())
            .or_else(|| default.filter(|key| !key.trim().is_empty()))
            .map(|key| Self(key.trim().to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "Credential({}***)", prefix)
    }
}

/// The photo every scene is anchored to, carried inline as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub mime_type: String,
    pub data: String,
}

impl ReferenceImage {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    pub fn from_base64(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_list_order() {
        let tiers = ModelTierList::new(["pro", "flash", "lite"]);
        assert_eq!(tiers.premium(), "pro");
        assert_eq!(tiers.fallback(), Some("flash"));
        assert_eq!(tiers.standard(), "lite");
        assert_eq!(tiers.iter().collect::<Vec<_>>(), vec!["pro", "flash", "lite"]);

        let single = ModelTierList::new(vec!["only".to_string()]);
        assert_eq!(single.premium(), single.standard());
        assert_eq!(single.fallback(), None);
    }

    #[test]
    #[should_panic(expected = "at least one model")]
    fn test_empty_tier_list_panics() {
        let _ = ModelTierList::new(Vec::<String>::new());
    }

    #[test]
    fn test_credential_resolution() {
        assert_eq!(
            Credential::resolve(Some("explicit"), Some("default")),
            Some(Credential::new("explicit"))
        );
        assert_eq!(
            Credential::resolve(Some("  "), Some("default")),
            Some(Credential::new("default"))
        );
        assert_eq!(Credential::resolve(None, None), None);
        assert_eq!(Credential::resolve(Some(""), Some("")), None);
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let key = Credential::new("AIzaSyVerySecret");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("VerySecret"));
        assert!(printed.starts_with("Credential(AIza"));
    }

    #[test]
    fn test_reference_image_encoding() {
        let image = ReferenceImage::from_bytes("image/png", b"hello");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.mime_type, "image/png");
    }
}
