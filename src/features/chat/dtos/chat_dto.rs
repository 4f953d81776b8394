use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::llm::ChatMessage;
use crate::shared::prompts::store::DEFAULT_STYLE;

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

/// Request DTO for a templated chat completion
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequestDto {
    /// Template style, e.g. `default` or `study.beginner`
    #[serde(default = "default_style")]
    #[schema(example = "study.beginner")]
    pub style: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "At least one message is required"))]
    pub messages: Vec<ChatMessage>,
}

/// Request DTO for image generation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImageRequestDto {
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,

    #[serde(default = "default_style")]
    pub style: String,
}

/// Template styles known to the prompt store
#[derive(Debug, Serialize, ToSchema)]
pub struct PromptCatalogDto {
    /// Top-level chat styles
    pub chat: Vec<String>,
    /// Top-level image styles
    pub image: Vec<String>,
    /// Levels usable as `study.<level>`
    pub study_levels: Vec<String>,
}
