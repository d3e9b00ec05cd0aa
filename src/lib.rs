//! Nine-scene storyboards from a single reference photo, generated through the
//! Gemini API.
//!
//! [`GeminiClient`] validates keys, suggests story categories, authors a
//! storyboard plan whose every scene is anchored to the person in the photo,
//! and renders each scene. Plan calls walk the text tiers premium first and
//! demote on timeouts or access denials; renders get one standard-tier retry.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompts;

pub use config::GeminiConfig;
pub use error::{ErrorKind, Result, StoryboardError};
pub use gemini::{
    GeminiClient, GenerativeBackend, HttpBackend, ImageClient, KeyValidator, TextClient,
    ValidationResult,
};
pub use models::*;
