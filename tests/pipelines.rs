use email_crew::config::Config;
use email_crew::orchestrator::{Orchestrator, Pipeline, PipelineError};
use email_crew::samples;
use email_crew::types::{Email, Field, Importance, Usage};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chat_reply(content: &str) -> Value {
    json!({
        "model": "llama3.2",
        "created_at": "2024-12-01T10:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true,
        "prompt_eval_count": 20,
        "eval_count": 3
    })
}

fn orchestrator(server: &MockServer) -> Orchestrator {
    let config = Config::default().with_base_url(server.uri());
    Orchestrator::new(config, false).unwrap()
}

async fn mount_agent(server: &MockServer, role: &str, answer: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains(format!("You are {role}.")))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(answer)))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn important_email_gets_a_reply_with_label_as_context() {
    let server = MockServer::start().await;
    mount_agent(&server, "email classifier", "important", 1).await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("You are email responder."))
        .and(body_string_contains("working with:\\nimportant"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("Understood. I will review and provide feedback by EOD.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let email = Email::new("Hi John, please review the partnership agreement by EOD tomorrow.");
    let triage = orchestrator(&server).triage().run(&email).await.unwrap();

    assert_eq!(triage.importance, Importance::Important);
    assert_eq!(
        triage.reply.as_deref(),
        Some("Understood. I will review and provide feedback by EOD.")
    );
    assert_eq!(
        triage.token_usage,
        Usage { prompt_tokens: 40, completion_tokens: 6 }
    );
}

#[tokio::test]
async fn spam_is_not_answered() {
    let server = MockServer::start().await;
    mount_agent(&server, "email classifier", "Spam.", 1).await;
    mount_agent(&server, "email responder", "should never be asked", 0).await;

    let email = Email::new("Congratulations! You won a FREE $500 gift card. Click here.");
    let triage = orchestrator(&server).triage().run(&email).await.unwrap();

    assert_eq!(triage.importance, Importance::Spam);
    assert_eq!(triage.reply, None);
    assert_eq!(triage.token_usage.total(), 23);
}

#[tokio::test]
async fn casual_email_is_answered() {
    let server = MockServer::start().await;
    mount_agent(&server, "email classifier", "casual", 1).await;
    mount_agent(&server, "email responder", "Sounds good! Let's plan for 1 PM.", 1).await;

    let email = Email::new("Hey John, lunch tomorrow at the new Thai place?");
    let triage = orchestrator(&server).triage().run(&email).await.unwrap();

    assert_eq!(triage.importance, Importance::Casual);
    assert_eq!(triage.reply.as_deref(), Some("Sounds good! Let's plan for 1 PM."));
}

#[tokio::test]
async fn unrecognized_label_is_an_error() {
    let server = MockServer::start().await;
    mount_agent(&server, "email classifier", "This looks urgent to me", 1).await;
    // no valid rating, so no reply is drafted
    mount_agent(&server, "email responder", "Noted.", 0).await;

    let err = orchestrator(&server)
        .triage()
        .run(&Email::new("Server is down"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Label(_)));
}

#[tokio::test]
async fn parser_requests_json_and_decodes_record() {
    let server = MockServer::start().await;
    let case = samples::parsing_cases().remove(0);
    let answer = "```json\n{\"Sender Name\": \"John Doe\", \"House Address\": \"456 Oak Street, Denver, CO, 80201\", \"Years of Work Experience\": 10, \"Highest Education Qualification\": \"PhD in Data Science\", \"Age\": 45}\n```";

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "model": "llama3.2", "stream": false, "format": "json" })))
        .and(body_string_contains("You are email data parser."))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(answer)))
        .expect(1)
        .mount(&server)
        .await;

    let record = orchestrator(&server).parse().run(&case.input).await.unwrap();
    assert_eq!(record, case.expected);
}

#[tokio::test]
async fn parser_maps_sentinel_to_not_available() {
    let server = MockServer::start().await;
    mount_agent(
        &server,
        "email data parser",
        r#"{"Sender Name":"John","House Address":"N/A","Years of Work Experience":"N/A","Highest Education Qualification":"N/A","Age":"N/A"}"#,
        1,
    )
    .await;

    let record = orchestrator(&server)
        .parse()
        .run(&Email::new("Thanks, John"))
        .await
        .unwrap();
    assert_eq!(record.sender_name, Field::Value("John".to_string()));
    assert_eq!(record.house_address, Field::NotAvailable);
    assert_eq!(record.age, Field::NotAvailable);
}

#[tokio::test]
async fn parser_rejects_prose() {
    let server = MockServer::start().await;
    mount_agent(&server, "email data parser", "I could not find any details.", 1).await;

    let err = orchestrator(&server)
        .parse()
        .run(&Email::new("Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Record(_)));
}

#[tokio::test]
async fn suite_reports_mismatches_per_case() {
    let server = MockServer::start().await;
    mount_agent(&server, "email classifier", "casual", 6).await;

    let orchestrator = orchestrator(&server);
    let report = samples::run_suite(
        "classification",
        &orchestrator.classify(),
        &samples::classification_cases(),
    )
    .await;

    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(report.passed(), 2);
    assert!(!report.is_success());
    let failed: Vec<usize> = report.failures().map(|o| o.index).collect();
    assert_eq!(failed, vec![1, 2, 5, 6]);
    assert!(report.outcomes.iter().all(|o| o.actual == Some(Importance::Casual)));
}

#[tokio::test]
async fn suite_keeps_going_after_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "out of memory" })))
        .expect(4)
        .mount(&server)
        .await;

    let orchestrator = orchestrator(&server);
    let report =
        samples::run_suite("parsing", &orchestrator.parse(), &samples::parsing_cases()).await;

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.passed(), 0);
    for outcome in &report.outcomes {
        assert!(outcome.actual.is_none());
        assert!(outcome.error.as_deref().unwrap().contains("out of memory"));
    }
}
