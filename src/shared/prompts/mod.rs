//! Prompt management.
//!
//! - [`store`]: static prefix table applied to user messages before they are
//!   sent to the LLM (resolved by kind and style).
//! - [`engine`]: Jinja templates for the question and panel title built
//!   around a region name.

pub mod engine;
pub mod store;

pub use engine::{render_panel_title, render_region_question, TemplateError};
pub use store::{
    available_prompts, available_study_levels, process_prompt, resolve_template, PromptKind,
};
