//! Gemini decision engine integration tests
//!
//! Runs the engine against a mock generateContent endpoint.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchboard::core::{Decision, DecisionAction, GeminiConfig, SwitchboardError};
use switchboard::decision::{DecisionEngine, GeminiEngine};
use switchboard::router::History;

fn engine_for(server: &MockServer) -> GeminiEngine {
    GeminiEngine::new(
        GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: server.uri(),
        },
        "You are the Router Agent.".to_string(),
    )
}

fn candidate_with_text(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"}
        }]
    })
}

#[tokio::test]
async fn test_decide_parses_structured_output() {
    let server = MockServer::start().await;

    let decision_json = r#"{"thought": "Need the record", "action": "call_agent",
        "agent_name": "customer_data", "content": "Get customer 5"}"#;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with_text(decision_json)))
        .expect(1)
        .mount(&server)
        .await;

    let history = History::new("get id 5");
    let decision = engine_for(&server).decide(&history).await.unwrap();

    assert_eq!(decision.action, DecisionAction::CallAgent);
    assert_eq!(decision.agent_name.as_deref(), Some("customer_data"));
    assert_eq!(decision.content, "Get customer 5");
}

#[tokio::test]
async fn test_decide_sends_full_history() {
    let server = MockServer::start().await;

    // The prior exchange must reach the model as alternating turns
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(json!({
            "contents": [
                {"role": "user"},
                {"role": "model"},
                {"role": "user"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with_text(
            r#"{"thought": "done", "action": "final_answer", "content": "Charlie"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut history = History::new("get id 5");
    history.record_decision(Decision::call_agent("lookup", "customer_data", "Get 5"));
    history.record_agent_result("customer_data", "id=5,name=Charlie");

    let decision = engine_for(&server).decide(&history).await.unwrap();
    assert_eq!(decision.action, DecisionAction::FinalAnswer);
    assert_eq!(decision.content, "Charlie");
}

#[tokio::test]
async fn test_unparseable_model_output_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate_with_text("I'd call the data agent first.")),
        )
        .mount(&server)
        .await;

    let history = History::new("get id 5");
    let result = engine_for(&server).decide(&history).await;

    match result {
        Err(SwitchboardError::DecisionParse { raw }) => {
            assert!(raw.contains("data agent"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_is_recoverable_engine_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&server)
        .await;

    let history = History::new("get id 5");
    let result = engine_for(&server).decide(&history).await;

    match result {
        Err(err @ SwitchboardError::Engine(_)) => {
            assert!(err.is_recoverable());
            assert!(err.to_string().contains("429"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
