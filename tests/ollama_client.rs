use std::time::Duration;

use email_crew::config::Config;
use email_crew::ollama::{ChatMessage, OllamaClient, OllamaError, OutputFormat};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OllamaClient {
    OllamaClient::new(Config::default().with_base_url(server.uri())).unwrap()
}

fn messages() -> Vec<ChatMessage> {
    vec![ChatMessage::system("You are a test."), ChatMessage::user("Say hi")]
}

async fn respond_with(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn returns_content_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "mistral",
            "stream": false,
            "options": { "num_predict": 1024 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "hi" },
            "done": true,
            "prompt_eval_count": 12,
            "eval_count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = Config::default()
        .with_base_url(server.uri())
        .with_model("ollama/mistral");
    let client = OllamaClient::new(config).unwrap();
    let completion = client.chat(&messages(), OutputFormat::Text).await.unwrap();

    assert_eq!(completion.content, "hi");
    assert_eq!(completion.usage.prompt_tokens, 12);
    assert_eq!(completion.usage.completion_tokens, 2);
}

#[tokio::test]
async fn missing_counts_default_to_zero() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "casual" }
        })),
    )
    .await;

    let completion = client_for(&server)
        .chat(&messages(), OutputFormat::Text)
        .await
        .unwrap();
    assert_eq!(completion.usage.total(), 0);
}

#[tokio::test]
async fn busy_statuses_map_to_server_busy() {
    for status in [429u16, 502, 503, 504] {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(status)).await;

        let err = client_for(&server)
            .chat(&messages(), OutputFormat::Text)
            .await
            .unwrap_err();
        assert!(matches!(err, OllamaError::ServerBusy), "status {status}: {err:?}");
    }
}

#[tokio::test]
async fn missing_model_is_reported_by_name() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(404)
            .set_body_json(json!({ "error": "model \"llama3.2\" not found, try pulling it first" })),
    )
    .await;

    let err = client_for(&server)
        .chat(&messages(), OutputFormat::Text)
        .await
        .unwrap_err();
    match err {
        OllamaError::ModelNotFound { model } => assert_eq!(model, "llama3.2"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn other_failures_carry_server_message() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid options" })),
    )
    .await;

    let err = client_for(&server)
        .chat(&messages(), OutputFormat::Json)
        .await
        .unwrap_err();
    match err {
        OllamaError::ApiError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid options");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_and_empty_bodies_are_parse_errors() {
    let server = MockServer::start().await;
    respond_with(&server, ResponseTemplate::new(200).set_body_string("not json")).await;
    let err = client_for(&server)
        .chat(&messages(), OutputFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, OllamaError::ParseError { .. }));

    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "   " },
            "done": true
        })),
    )
    .await;
    let err = client_for(&server)
        .chat(&messages(), OutputFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, OllamaError::ParseError { .. }));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200)
            .set_delay(Duration::from_secs(3))
            .set_body_json(json!({ "message": { "role": "assistant", "content": "late" } })),
    )
    .await;

    let config = Config {
        timeout: 1,
        ..Config::default().with_base_url(server.uri())
    };
    let err = OllamaClient::new(config)
        .unwrap()
        .chat(&messages(), OutputFormat::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, OllamaError::Timeout { seconds: 1 }), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let client = OllamaClient::new(Config::default().with_base_url("http://127.0.0.1:1")).unwrap();
    let err = client.chat(&messages(), OutputFormat::Text).await.unwrap_err();
    assert!(matches!(err, OllamaError::NetworkError { .. }), "{err:?}");
}
