//! Integration tests for `OpenAiCompletionClient` against a `wiremock`
//! stand-in for the chat-completions API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cartscout_agent::{AgentError, ChatMessage, CompletionService, OpenAiCompletionClient};

fn test_client(server: &MockServer) -> OpenAiCompletionClient {
    OpenAiCompletionClient::new(
        &format!("{}/v1", server.uri()),
        "sk-test",
        "gpt-4o-mini",
        5,
        "cartscout-test/0.1",
    )
    .expect("failed to build test completion client")
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a shopping assistant."),
        ChatMessage::user("Find me running shoes"),
    ]
}

#[tokio::test]
async fn complete_posts_conversation_and_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.01,
            "messages": [
                {"role": "system", "content": "You are a shopping assistant."},
                {"role": "user", "content": "Find me running shoes"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = test_client(&server).complete(&conversation()).await.unwrap();
    assert_eq!(reply, "first");
}

#[tokio::test]
async fn complete_without_choices_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .complete(&conversation())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::EmptyCompletion), "got: {err:?}");
}

#[tokio::test]
async fn complete_surfaces_error_status_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid api key"}"#),
        )
        .mount(&server)
        .await;

    let err = test_client(&server)
        .complete(&conversation())
        .await
        .unwrap_err();
    match err {
        AgentError::CompletionStatus { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid api key"));
        }
        other => panic!("expected CompletionStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn complete_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .complete(&conversation())
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::Json { .. }), "got: {err:?}");
}
