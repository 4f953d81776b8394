//! LLM proxy feature.
//!
//! Holds the provider key server-side and applies the prompt template table
//! before forwarding.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/deepseek/chat` | Templated chat completion |
//! | POST | `/api/deepseek/images` | Single 1024x1024 image generation |
//! | GET | `/api/prompts` | Available template styles and study levels |

pub mod dtos;
pub mod handlers;
pub mod routes;
