use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// A role-tagged chat message.
///
/// Fields other than `role` and `content` are kept and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub const USER: &'static str = "user";

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Self::USER.to_string(),
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Self::USER
    }
}

/// What a completion envelope carries at `choices[0].message.content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContent {
    /// Non-empty text
    Text(String),
    /// The message is there but its content is missing, null or empty
    Empty,
    /// The envelope does not have the expected shape
    Malformed,
}

/// Inspect a raw chat-completion body without assuming it is well formed.
pub fn extract_completion_content(body: &Value) -> CompletionContent {
    let Some(message) = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .filter(|message| message.is_object())
    else {
        return CompletionContent::Malformed;
    };

    match message.get("content") {
        None | Some(Value::Null) => CompletionContent::Empty,
        Some(Value::String(s)) if s.is_empty() => CompletionContent::Empty,
        Some(Value::String(s)) => CompletionContent::Text(s.clone()),
        Some(_) => CompletionContent::Malformed,
    }
}
