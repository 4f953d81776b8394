use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::chat::handlers;
use crate::shared::llm::LlmClient;

/// Create routes for the LLM proxy feature
pub fn routes(client: Arc<LlmClient>) -> Router {
    Router::new()
        .route("/api/deepseek/chat", post(handlers::chat))
        .route("/api/deepseek/images", post(handlers::generate_image))
        .route("/api/prompts", get(handlers::list_prompts))
        .with_state(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LlmConfig;
    use crate::shared::test_helpers::spawn_upstream;
    use axum::{http::StatusCode, Json};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server_with_upstream(endpoint: String) -> TestServer {
        let client = Arc::new(LlmClient::new(&LlmConfig {
            api_key: "sk-test".to_string(),
            endpoint,
            model: "deepseek-chat".to_string(),
        }));
        TestServer::new(routes(client)).unwrap()
    }

    #[tokio::test]
    async fn test_chat_applies_study_template() {
        let upstream = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                let content = body["messages"][0]["content"].clone();
                Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
            }),
        );
        let server = server_with_upstream(spawn_upstream(upstream).await);

        let response = server
            .post("/api/deepseek/chat")
            .json(&json!({
                "style": "study.professional",
                "messages": [{"role": "user", "content": "成都市的地理特征和知识"}]
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["choices"][0]["message"]["content"],
            "请提供适合研究生的地理知识点。1000字以内。成都市的地理特征和知识"
        );
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_messages() {
        let server = server_with_upstream("http://127.0.0.1:9".to_string());

        server
            .post("/api/deepseek/chat")
            .json(&json!({"style": "default", "messages": []}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_rejects_malformed_json() {
        let server = server_with_upstream("http://127.0.0.1:9".to_string());

        server
            .post("/api/deepseek/chat")
            .json(&json!({"messages": "not a list"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_error_status_is_bad_gateway() {
        let upstream = Router::new().route(
            "/chat/completions",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let server = server_with_upstream(spawn_upstream(upstream).await);

        let response = server
            .post("/api/deepseek/chat")
            .json(&json!({"messages": [{"role": "user", "content": "x"}]}))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["message"], "API request failed: 401");
    }

    #[tokio::test]
    async fn test_generate_image_route() {
        let upstream = Router::new().route(
            "/images/generations",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"data": [{"url": "https://img/1.png"}], "size": body["size"]}))
            }),
        );
        let server = server_with_upstream(spawn_upstream(upstream).await);

        let response = server
            .post("/api/deepseek/images")
            .json(&json!({"prompt": "黄山云海"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["size"], "1024x1024");
    }

    #[tokio::test]
    async fn test_list_prompts() {
        let server = server_with_upstream("http://127.0.0.1:9".to_string());

        let response = server.get("/api/prompts").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["chat"], json!(["default", "study"]));
        assert_eq!(body["data"]["image"], json!([]));
        assert_eq!(
            body["data"]["study_levels"],
            json!(["default", "beginner", "advanced", "practical", "professional"])
        );
    }
}
