//! Integration tests for the chat-completions client.
//!
//! These tests make real API calls to the default DeepSeek endpoint.
//! Run with: DEEPSEEK_API_KEY=your_key cargo test --test llm_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use seo_forge::config::LlmSettings;
use seo_forge::generation::{parse_completion, GenerationTask};
use seo_forge::llm::{ApiKey, ChatClient, GenerationRequest, LlmProvider, Message};

fn create_test_client() -> ChatClient {
    let settings = LlmSettings::default();
    let key = std::env::var(&settings.api_key_env)
        .expect("DEEPSEEK_API_KEY environment variable must be set for integration tests");
    ChatClient::from_settings(&settings, Arc::new(ApiKey::from_value(key)))
        .expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test --test llm_integration -- --ignored
async fn test_simple_generation() {
    let client = create_test_client();

    let request = GenerationRequest::new(
        LlmSettings::default().model,
        vec![
            Message::system("You are a helpful assistant. Reply concisely."),
            Message::user("What is 2 + 2? Reply with just the number."),
        ],
    )
    .with_max_tokens(10)
    .with_temperature(0.0);

    let response = client.generate(request).await;
    assert!(response.is_ok(), "Generation failed: {:?}", response.err());

    let response = response.expect("Should have response");
    let content = response.first_content().expect("Should have content");
    assert!(
        content.contains('4'),
        "Response should contain '4', got: {}",
        content
    );
    assert!(response.usage.total_tokens > 0, "Should have token usage");
}

#[tokio::test]
#[ignore]
async fn test_title_line_parses() {
    let client = create_test_client();
    let task = GenerationTask::new("lavender", "en", "routine");

    let request = GenerationRequest::new(
        LlmSettings::default().model,
        vec![Message::user(format!(
            "Write a one-line title for a short note about {}, then one short paragraph.",
            task
        ))],
    )
    .with_max_tokens(120);

    let response = client.generate(request).await.expect("Generation should succeed");
    let content = response.first_content().expect("Should have content");
    let (title, _body) = parse_completion(content).expect("Should have a title line");
    assert!(!title.is_empty());
}

#[tokio::test]
async fn test_invalid_api_key() {
    let client = ChatClient::new(
        LlmSettings::default().api_url,
        Arc::new(ApiKey::from_value("invalid-key")),
        Duration::from_secs(20),
    )
    .expect("Failed to build client");

    let request = GenerationRequest::new("deepseek-chat", vec![Message::user("test")])
        .with_max_tokens(5);

    let response = client.generate(request).await;
    assert!(response.is_err(), "Should fail with invalid API key");
}
