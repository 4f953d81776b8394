use utoipa::{Modify, OpenApi};

use crate::features::chat::{dtos as chat_dtos, handlers as chat_handlers};
use crate::features::geo::{handlers as geo_handlers, models as geo_models};
use crate::shared::llm::ChatMessage;
use crate::shared::prompts::PromptKind;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Geo proxy
        geo_handlers::geocode,
        geo_handlers::district,
        // LLM proxy
        chat_handlers::chat,
        chat_handlers::generate_image,
        chat_handlers::list_prompts,
    ),
    components(
        schemas(
            geo_models::District,
            geo_models::DistrictSearchResult,
            chat_dtos::ChatRequestDto,
            chat_dtos::ImageRequestDto,
            chat_dtos::PromptCatalogDto,
            ChatMessage,
            PromptKind,
        )
    ),
    tags(
        (name = "geo", description = "Reverse geocoding and district boundaries (AMap proxy)"),
        (name = "llm", description = "Templated chat and image generation (DeepSeek proxy)"),
    ),
    info(
        title = "District Explorer API",
        version = "0.1.0",
        description = "Geocoding, district boundary and geography tutor proxy",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
