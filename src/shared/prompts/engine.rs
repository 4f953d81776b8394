//! Jinja templates for the text the explorer builds around a region name.
//!
//! The templates are compiled once into a process-wide environment. They are
//! tiny, but keeping them here means the question sent to the LLM and the
//! panel title are defined in one place.

use minijinja::{context, Environment};
use std::sync::OnceLock;
use thiserror::Error;

/// Question asked about a region; the level prefix is added by the prompt store.
pub const REGION_QUESTION: &str = "region_question";

/// Info panel title, e.g. `上海市 (初中水平)`.
pub const PANEL_TITLE: &str = "panel_title";

const TEMPLATES: &[(&str, &str)] = &[
    (REGION_QUESTION, "{{ region }}的地理特征和知识"),
    (PANEL_TITLE, "{{ region }} ({{ level_name }})"),
];

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(*name, *source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(name)
        .map_err(|_| TemplateError::NotFound(name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Render the geography question for a region.
pub fn render_region_question(region: &str) -> Result<String, TemplateError> {
    render(REGION_QUESTION, context! { region => region })
}

/// Render the info panel title for a region at a level.
pub fn render_panel_title(region: &str, level_name: &str) -> Result<String, TemplateError> {
    render(
        PANEL_TITLE,
        context! { region => region, level_name => level_name },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_region_question() {
        assert_eq!(
            render_region_question("上海市").unwrap(),
            "上海市的地理特征和知识"
        );
    }

    #[test]
    fn test_render_panel_title() {
        assert_eq!(
            render_panel_title("北京市", "小学水平").unwrap(),
            "北京市 (小学水平)"
        );
    }

    #[test]
    fn test_region_is_not_html_escaped() {
        // Templates are registered without an extension, so auto-escape stays off
        assert_eq!(
            render_region_question("A&B").unwrap(),
            "A&B的地理特征和知识"
        );
    }

    #[test]
    fn test_unknown_template() {
        let result = render("nonexistent", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }
}
