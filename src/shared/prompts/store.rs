//! Static prompt prefixes prepended to user content before it reaches the LLM.
//!
//! The table is keyed first by [`PromptKind`], then by style. Chat styles that
//! start with `study` are resolved inside the nested `study` group, where the
//! part after the first `.` selects the difficulty level:
//!
//! | style              | lookup order                                        |
//! |--------------------|-----------------------------------------------------|
//! | `study.<level>`    | `study.<level>` → `study.default` → `""`            |
//! | anything else      | `<style>` → `default` → `""`                        |
//!
//! Unknown kinds or styles never fail. They fall back to the nearest default
//! and, when there is none, to the empty prefix so the content passes through
//! unchanged.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Top-level category of the template table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Chat,
    Image,
}

/// Style prefix that routes chat lookups into the nested study group
pub const STUDY_STYLE: &str = "study";

/// Key used as the fallback entry at every nesting level
pub const DEFAULT_STYLE: &str = "default";

enum TemplateNode {
    Text(&'static str),
    Group(&'static [(&'static str, TemplateNode)]),
}

type TemplateGroup = &'static [(&'static str, TemplateNode)];

const CHAT_TEMPLATES: TemplateGroup = &[
    (
        DEFAULT_STYLE,
        TemplateNode::Text("请根据上下文提供专业、准确的回答。"),
    ),
    (
        STUDY_STYLE,
        TemplateNode::Group(&[
            (
                DEFAULT_STYLE,
                TemplateNode::Text("请提供关于该地区的小学地理知识点。100字以内。"),
            ),
            (
                "beginner",
                TemplateNode::Text("请提供适合初中生的地理知识点。200字以内。"),
            ),
            (
                "advanced",
                TemplateNode::Text("请提供适合高中生的地理知识点。300字以内。"),
            ),
            (
                "practical",
                TemplateNode::Text("请提供适合大学生的地理知识点。500字以内。"),
            ),
            (
                "professional",
                TemplateNode::Text("请提供适合研究生的地理知识点。1000字以内。"),
            ),
        ]),
    ),
];

// Image prompts are passed through as-is for now.
const IMAGE_TEMPLATES: TemplateGroup = &[];

fn category(kind: PromptKind) -> TemplateGroup {
    match kind {
        PromptKind::Chat => CHAT_TEMPLATES,
        PromptKind::Image => IMAGE_TEMPLATES,
    }
}

fn node<'a>(group: &'a [(&'static str, TemplateNode)], key: &str) -> Option<&'a TemplateNode> {
    group.iter().find(|(k, _)| *k == key).map(|(_, n)| n)
}

/// Text leaf under `key`; groups are never treated as templates.
fn text(group: &[(&'static str, TemplateNode)], key: &str) -> Option<&'static str> {
    match node(group, key) {
        Some(TemplateNode::Text(t)) => Some(*t),
        _ => None,
    }
}

/// Two-level lookup: exact key, then the group's own default, then empty.
fn lookup_with_default(group: &[(&'static str, TemplateNode)], key: &str) -> &'static str {
    text(group, key)
        .or_else(|| text(group, DEFAULT_STYLE))
        .unwrap_or("")
}

/// Resolve the template prefix for `(kind, style)`.
pub fn resolve_template(kind: PromptKind, style: &str) -> &'static str {
    let templates = category(kind);

    if kind == PromptKind::Chat && style.starts_with(STUDY_STYLE) {
        let study = match node(templates, STUDY_STYLE) {
            Some(TemplateNode::Group(group)) => *group,
            _ => &[],
        };
        let level = style
            .split_once('.')
            .map(|(_, level)| level)
            .unwrap_or(style);
        return lookup_with_default(study, level);
    }

    lookup_with_default(templates, style)
}

/// Produce `template + content` for the given kind and style.
pub fn process_prompt(kind: PromptKind, style: &str, content: &str) -> String {
    format!("{}{}", resolve_template(kind, style), content)
}

/// Style keys available at the top level of a kind
pub fn available_prompts(kind: PromptKind) -> Vec<&'static str> {
    category(kind).iter().map(|(key, _)| *key).collect()
}

/// Level keys available inside the chat study group
pub fn available_study_levels() -> Vec<&'static str> {
    match node(CHAT_TEMPLATES, STUDY_STYLE) {
        Some(TemplateNode::Group(group)) => group.iter().map(|(key, _)| *key).collect(),
        _ => Vec::new(),
    }
}
