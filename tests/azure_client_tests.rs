// Azure OpenAI client tests - the chat-completions client against a mock
// HTTP server.

use mongo_mcp_client::config::AzureOpenAIConfig;
use mongo_mcp_client::model::{AzureOpenAIClient, ModelError, ModelProvider, ModelRequest};
use mongo_mcp_client::types::{ChatMessage, MessageRole, ToolSpec};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/openai/deployments/OpenAIGPT4/chat/completions";

fn config_for(server: &MockServer) -> AzureOpenAIConfig {
    AzureOpenAIConfig {
        endpoint: Some(server.uri()),
        api_key: Some("test-key".into()),
        api_version: Some("2024-06-01".into()),
        ..AzureOpenAIConfig::default()
    }
}

fn request() -> ModelRequest {
    ModelRequest {
        messages: vec![
            ChatMessage::system("You are a MongoDB assistant."),
            ChatMessage::user("list all databases"),
        ],
        tools: vec![ToolSpec {
            name: "list_databases".into(),
            description: Some("List all databases".into()),
            parameters: json!({"type": "object", "properties": {}}),
        }],
    }
}

fn completion(message: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": message, "finish_reason": "stop"}]
    }))
}

#[tokio::test]
async fn sends_deployment_request_with_key_and_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(query_param("api-version", "2024-06-01"))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "You are a MongoDB assistant."},
                {"role": "user", "content": "list all databases"}
            ],
            "tools": [{"type": "function", "function": {"name": "list_databases"}}]
        })))
        .respond_with(completion(json!({
            "role": "assistant",
            "content": "You have admin and sales."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::from_config(&config_for(&server)).expect("client");
    let response = client.chat(request()).await.expect("chat succeeds");

    assert_eq!(response.message.role, MessageRole::Assistant);
    assert_eq!(response.message.content, "You have admin and sales.");
    assert!(response.message.tool_calls.is_empty());
}

#[tokio::test]
async fn parses_tool_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(completion(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_abc",
                "type": "function",
                "function": {"name": "list_databases", "arguments": "{}"}
            }]
        })))
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::from_config(&config_for(&server)).expect("client");
    let response = client.chat(request()).await.expect("chat succeeds");

    assert_eq!(response.message.content, "");
    assert_eq!(response.message.tool_calls.len(), 1);
    let call = &response.message.tool_calls[0];
    assert_eq!(call.id, "call_abc");
    assert_eq!(call.name, "list_databases");
    assert_eq!(call.arguments, "{}");
}

#[tokio::test]
async fn retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(completion(json!({"role": "assistant", "content": "recovered"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::from_config(&config_for(&server)).expect("client");
    let response = client.chat(request()).await.expect("retry succeeds");

    assert_eq!(response.message.content, "recovered");
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::from_config(&config_for(&server)).expect("client");
    let err = client.chat(request()).await.expect_err("400 fails");

    match err {
        ModelError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(body, "bad request");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_choices_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::from_config(&config_for(&server)).expect("client");
    let err = client.chat(request()).await.expect_err("no choices");

    assert!(matches!(err, ModelError::InvalidResponse { .. }));
}

#[tokio::test]
async fn oversized_retry_after_does_not_panic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1e30"))
        .expect(1)
        .mount(&server)
        .await;

    let config = AzureOpenAIConfig {
        max_retries: 0,
        ..config_for(&server)
    };
    let client = AzureOpenAIClient::from_config(&config).expect("client");
    let err = client.chat(request()).await.expect_err("429 fails");

    assert!(matches!(err, ModelError::Status { status, .. } if status.as_u16() == 429));
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(3)
        .mount(&server)
        .await;

    let config = AzureOpenAIConfig {
        max_retries: 2,
        ..config_for(&server)
    };
    let client = AzureOpenAIClient::from_config(&config).expect("client");
    let started = std::time::Instant::now();
    let err = client.chat(request()).await.expect_err("retries exhausted");

    assert!(matches!(err, ModelError::Status { status, .. } if status.as_u16() == 503));
    // 0.5s then 1s of backoff between the three attempts.
    assert!(started.elapsed() >= std::time::Duration::from_millis(1500));
}
