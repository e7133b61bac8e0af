use erpforge_llm_sdk::claude::ClaudeClient;
use erpforge_llm_sdk::client::{EmbeddingClient, LlmClient};
use erpforge_llm_sdk::error::LlmError;
use erpforge_llm_sdk::types::{CompletionRequest, Message};
use erpforge_llm_sdk::voyage::VoyageClient;

#[tokio::test]
async fn claude_complete_parses_text_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": "msg_01",
                "type": "message",
                "role": "assistant",
                "model": "claude-sonnet-4-5-20250929",
                "content": [{"type": "text", "text": "Hello there"}],
                "stop_reason": "end_turn",
                "stop_sequence": null,
                "usage": {"input_tokens": 12, "output_tokens": 4}
            }"#,
        )
        .create_async()
        .await;

    let client = ClaudeClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let request = CompletionRequest::new(
        "claude-sonnet-4-5-20250929",
        vec![Message::user("Hi")],
        256,
    );

    let response = client.complete(request).await.unwrap();
    assert_eq!(response.text(), "Hello there");
    assert_eq!(response.usage.input_tokens, 12);
    mock.assert_async().await;
}

#[tokio::test]
async fn claude_maps_rate_limit_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(429)
        .with_header("retry-after", "30")
        .with_body(
            r#"{"type": "error", "error": {"type": "rate_limit_error", "message": "slow down"}}"#,
        )
        .create_async()
        .await;

    let client = ClaudeClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let request = CompletionRequest::new("claude-sonnet-4-5-20250929", vec![Message::user("Hi")], 8);
    let err = client.complete(request).await.unwrap_err();

    match err {
        LlmError::RateLimit {
            message,
            retry_after,
        } => {
            assert_eq!(message, "slow down");
            assert_eq!(retry_after, Some(30));
        }
        other => panic!("expected rate limit error, got {:?}", other),
    }
}

#[tokio::test]
async fn claude_maps_authentication_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(
            r#"{"type": "error", "error": {"type": "authentication_error", "message": "bad key"}}"#,
        )
        .create_async()
        .await;

    let client = ClaudeClient::new("wrong-key")
        .unwrap()
        .with_base_url(server.url());

    let request = CompletionRequest::new("claude-sonnet-4-5-20250929", vec![Message::user("Hi")], 8);
    let err = client.complete(request).await.unwrap_err();
    assert!(matches!(err, LlmError::Authentication { .. }));
}

#[tokio::test]
async fn voyage_embed_documents_preserves_input_order() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "object": "list",
                "data": [
                    {"object": "embedding", "embedding": [0.5, 0.5], "index": 1},
                    {"object": "embedding", "embedding": [0.1, 0.2], "index": 0}
                ],
                "model": "voyage-4-lite",
                "usage": {"total_tokens": 10}
            }"#,
        )
        .create_async()
        .await;

    let client = VoyageClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let embeddings = client
        .embed_documents(vec!["first".to_string(), "second".to_string()])
        .await
        .unwrap();

    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[0], vec![0.1, 0.2]);
    assert_eq!(embeddings[1], vec![0.5, 0.5]);
}

#[tokio::test]
async fn voyage_embed_documents_empty_batch_skips_request() {
    // No mock server registered: an HTTP call would fail the test.
    let client = VoyageClient::new("test-key")
        .unwrap()
        .with_base_url("http://127.0.0.1:1");

    let embeddings = client.embed_documents(Vec::new()).await.unwrap();
    assert!(embeddings.is_empty());
}

#[tokio::test]
async fn voyage_embed_query_returns_single_vector() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/embeddings")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "object": "list",
                "data": [{"object": "embedding", "embedding": [1.0, 0.0, 0.0], "index": 0}],
                "model": "voyage-4-lite",
                "usage": {"total_tokens": 3}
            }"#,
        )
        .create_async()
        .await;

    let client = VoyageClient::new("test-key")
        .unwrap()
        .with_base_url(server.url());

    let embedding = client.embed_query("warehouse locations").await.unwrap();
    assert_eq!(embedding, vec![1.0, 0.0, 0.0]);
}
