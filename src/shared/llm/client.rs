use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::core::config::LlmConfig;
use crate::core::error::{AppError, Result};
use crate::shared::llm::response::ChatMessage;
use crate::shared::prompts::{process_prompt, PromptKind};

/// Size of every generated image
pub const IMAGE_SIZE: &str = "1024x1024";

/// Anything that can answer a chat request with a raw completion body.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `messages` with the given template `style` and return the
    /// provider's completion envelope untouched.
    async fn chat(&self, messages: Vec<ChatMessage>, style: &str) -> Result<Value>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

/// Apply the chat template for `style` to every user message.
pub fn apply_chat_template(messages: Vec<ChatMessage>, style: &str) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .map(|mut msg| {
            if msg.is_user() {
                msg.content = process_prompt(PromptKind::Chat, style, &msg.content);
            }
            msg
        })
        .collect()
}

/// Client for a DeepSeek-compatible chat/image API.
///
/// Every call is a single attempt; failures are logged and returned.
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Chat completion with the style template applied to user messages
    pub async fn chat(&self, messages: Vec<ChatMessage>, style: &str) -> Result<Value> {
        let messages = apply_chat_template(messages, style);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        tracing::debug!(
            "Sending chat completion: model={}, style={}, messages={}",
            self.model,
            style,
            messages.len()
        );

        self.post_json("chat/completions", &body).await
    }

    /// Single square image generation
    pub async fn generate_image(&self, prompt: &str, style: &str) -> Result<Value> {
        let prompt = process_prompt(PromptKind::Image, style, prompt);
        let body = ImageGenerationRequest {
            prompt: &prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        self.post_json("images/generations", &body).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = format!("{}/{}", self.endpoint, path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("LLM request to {} failed: {}", path, e);
                AppError::ExternalServiceError(format!("LLM request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("LLM API {} returned status {}", path, status);
            return Err(AppError::ApiRequestFailed {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            tracing::error!("Failed to parse LLM {} response: {}", path, e);
            AppError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn chat(&self, messages: Vec<ChatMessage>, style: &str) -> Result<Value> {
        LlmClient::chat(self, messages, style).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::spawn_upstream;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    fn client_for(endpoint: String) -> LlmClient {
        LlmClient::new(&LlmConfig {
            api_key: "test-key".to_string(),
            endpoint,
            model: "deepseek-chat".to_string(),
        })
    }

    #[test]
    fn test_apply_chat_template_only_touches_user_messages() {
        let system = ChatMessage {
            role: "system".to_string(),
            content: "be brief".to_string(),
            extra: Default::default(),
        };
        let out = apply_chat_template(
            vec![system.clone(), ChatMessage::user("上海市")],
            "study.practical",
        );

        assert_eq!(out[0], system);
        assert_eq!(
            out[1].content,
            "请提供适合大学生的地理知识点。500字以内。上海市"
        );
    }

    #[tokio::test]
    async fn test_chat_sends_model_and_templated_messages() {
        // Echo the request back so the test can inspect what was sent
        let upstream = Router::new().route(
            "/v1/chat/completions",
            post(
                |headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "auth": auth, "echo": body }))
                },
            ),
        );
        let base = spawn_upstream(upstream).await;
        let client = client_for(format!("{}/v1", base));

        let body = client
            .chat(vec![ChatMessage::user("北京市")], "study.beginner")
            .await
            .unwrap();

        assert_eq!(body["auth"], "Bearer test-key");
        assert_eq!(body["echo"]["model"], "deepseek-chat");
        assert_eq!(
            body["echo"]["messages"][0]["content"],
            "请提供适合初中生的地理知识点。200字以内。北京市"
        );
    }

    #[tokio::test]
    async fn test_chat_non_success_status_is_api_request_failed() {
        let upstream = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::PAYMENT_REQUIRED, "Insufficient Balance") }),
        );
        let base = spawn_upstream(upstream).await;
        let client = client_for(base);

        let err = client
            .chat(vec![ChatMessage::user("x")], "default")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ApiRequestFailed { status: 402 }));
        assert_eq!(err.to_string(), "API request failed: 402");
    }

    #[tokio::test]
    async fn test_generate_image_request_shape() {
        let upstream = Router::new().route(
            "/images/generations",
            post(|Json(body): Json<Value>| async move { Json(body) }),
        );
        let base = spawn_upstream(upstream).await;
        let client = client_for(base);

        let body = client.generate_image("西湖", "default").await.unwrap();

        assert_eq!(body, json!({"prompt": "西湖", "n": 1, "size": "1024x1024"}));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_external_error() {
        // Nothing listens on port 9 of localhost in the test environment
        let client = client_for("http://127.0.0.1:9".to_string());
        let err = client
            .chat(vec![ChatMessage::user("x")], "default")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
