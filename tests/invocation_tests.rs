use std::sync::Arc;
use std::time::Duration;

use tradefleet::application::invocation::{InvocationClient, RetryPolicy};
use tradefleet::domain::{InvocationConfig, ModelProvider};
use tradefleet::error::InvocationError;
use tradefleet::testkit::config::retry;
use tradefleet::testkit::llm::{completion, ScriptedTransport};

fn deepseek(key: &str) -> InvocationConfig {
    InvocationConfig::for_provider(ModelProvider::DeepSeek, key, Duration::from_secs(120))
        .unwrap_or_else(|| panic!("deepseek has defaults"))
}

fn client(transport: &Arc<ScriptedTransport>) -> InvocationClient {
    InvocationClient::new(transport.clone(), retry())
}

#[tokio::test]
async fn transient_failures_exhaust_the_attempt_budget() {
    let transport = Arc::new(ScriptedTransport::always(|| {
        InvocationError::Transient("connection reset by peer".into())
    }));

    let err = client(&transport)
        .invoke(&deepseek("sk-1"), "system", "user")
        .await
        .unwrap_err();

    assert_eq!(transport.attempts(), 3);
    match err {
        InvocationError::Exhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(source.to_string().contains("connection reset"));
        }
        other => panic!("expected exhaustion, got {other}"),
    }
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let transport = Arc::new(ScriptedTransport::always(|| InvocationError::Status {
        status: 401,
        body: "invalid api key".into(),
    }));

    let err = client(&transport)
        .invoke(&deepseek("sk-1"), "system", "user")
        .await
        .unwrap_err();

    assert_eq!(transport.attempts(), 1);
    assert!(matches!(err, InvocationError::Status { status: 401, .. }));
}

#[tokio::test]
async fn status_with_transient_body_is_retried() {
    let transport = Arc::new(ScriptedTransport::replying("ok").with_script(vec![Err(
        InvocationError::Status {
            status: 502,
            body: "upstream: Connection Reset".into(),
        },
    )]));

    let content = client(&transport)
        .invoke(&deepseek("sk-1"), "system", "user")
        .await
        .unwrap();

    assert_eq!(content, "ok");
    assert_eq!(transport.attempts(), 2);
}

#[tokio::test]
async fn missing_api_key_fails_before_any_call() {
    let transport = Arc::new(ScriptedTransport::replying("unused"));

    let err = client(&transport)
        .invoke(&deepseek("  "), "system", "user")
        .await
        .unwrap_err();

    assert!(matches!(err, InvocationError::Configuration(_)));
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let transport = Arc::new(ScriptedTransport::empty());

    let err = client(&transport)
        .invoke(&deepseek("sk-1"), "system", "user")
        .await
        .unwrap_err();

    assert!(matches!(err, InvocationError::EmptyResponse));
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn backoff_grows_linearly() {
    let transport = Arc::new(ScriptedTransport::replying("final").with_script(vec![
        Err(InvocationError::Transient("timeout".into())),
        Ok(completion("second")),
    ]));
    let client = InvocationClient::new(
        transport.clone(),
        RetryPolicy::new(3, Duration::from_secs(2)),
    );

    let started = tokio::time::Instant::now();
    let content = client
        .invoke(&deepseek("sk-1"), "system", "user")
        .await
        .unwrap();

    assert_eq!(content, "second");
    assert_eq!(started.elapsed(), Duration::from_secs(2));
}

#[tokio::test]
async fn request_carries_fixed_sampling_parameters() {
    let transport = Arc::new(ScriptedTransport::replying("ok"));
    let config = InvocationConfig::custom(
        "http://localhost:9/v1",
        "key",
        "local-model",
        Duration::from_secs(5),
    );

    client(&transport).invoke(&config, "", "hello").await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.model, "local-model");
    assert_eq!(request.messages.len(), 1);
    assert!((request.temperature - 0.5).abs() < f64::EPSILON);
    assert_eq!(request.max_tokens, 2000);
}
