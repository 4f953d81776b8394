use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::chat::dtos::{ChatRequestDto, ImageRequestDto, PromptCatalogDto};
use crate::shared::llm::LlmClient;
use crate::shared::prompts::{available_prompts, available_study_levels, PromptKind};
use crate::shared::types::ApiResponse;

/// Templated chat completion
///
/// Every user message is prefixed with the template selected by `style`
/// before being forwarded. The provider's completion envelope is returned
/// unchanged.
#[utoipa::path(
    post,
    path = "/api/deepseek/chat",
    request_body = ChatRequestDto,
    responses(
        (status = 200, description = "Provider completion envelope", body = Object),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Provider failed")
    ),
    tag = "llm"
)]
pub async fn chat(
    State(client): State<Arc<LlmClient>>,
    AppJson(dto): AppJson<ChatRequestDto>,
) -> Result<Json<Value>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let body = client.chat(dto.messages, &dto.style).await?;
    Ok(Json(body))
}

/// Generate one square image
#[utoipa::path(
    post,
    path = "/api/deepseek/images",
    request_body = ImageRequestDto,
    responses(
        (status = 200, description = "Provider generation envelope", body = Object),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Provider failed")
    ),
    tag = "llm"
)]
pub async fn generate_image(
    State(client): State<Arc<LlmClient>>,
    AppJson(dto): AppJson<ImageRequestDto>,
) -> Result<Json<Value>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let body = client.generate_image(&dto.prompt, &dto.style).await?;
    Ok(Json(body))
}

/// List the available template styles
#[utoipa::path(
    get,
    path = "/api/prompts",
    responses(
        (status = 200, description = "Known chat/image styles and study levels", body = ApiResponse<PromptCatalogDto>),
    ),
    tag = "llm"
)]
pub async fn list_prompts() -> Json<ApiResponse<PromptCatalogDto>> {
    let owned = |keys: Vec<&str>| -> Vec<String> { keys.into_iter().map(String::from).collect() };
    let catalog = PromptCatalogDto {
        chat: owned(available_prompts(PromptKind::Chat)),
        image: owned(available_prompts(PromptKind::Image)),
        study_levels: owned(available_study_levels()),
    };
    Json(ApiResponse::success(Some(catalog), None))
}
