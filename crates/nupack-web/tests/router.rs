//! Route-level tests against a fake tool runner.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use nupack_common::{NupackError, Result};
use nupack_config::AboutConfig;
use nupack_runner::{Forwarder, Operation, PromptScript, ToolRun, ToolRunner};
use nupack_web::{router::build_router, state::AppState};

const LICENSE: &str = "NUPACK license terms";

#[derive(Clone, Copy)]
enum Outcome {
    Succeed,
    TimeOut,
    Malformed,
}

struct FakeRunner {
    outcome: Outcome,
    calls: Mutex<Vec<(Operation, PromptScript)>>,
}

impl FakeRunner {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self { outcome, calls: Mutex::new(Vec::new()) })
    }

    fn calls(&self) -> Vec<(Operation, PromptScript)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn run(&self, operation: Operation, script: PromptScript) -> Result<ToolRun> {
        self.calls.lock().unwrap().push((operation, script));
        match self.outcome {
            Outcome::Succeed => Ok(ToolRun {
                status: 0,
                result: json!({ "tool": operation.name() }),
            }),
            Outcome::TimeOut => Err(NupackError::Interaction {
                tool: operation.name().to_string(),
                reason: "prompt not seen".to_string(),
                timed_out: true,
                transcript: String::new(),
            }),
            Outcome::Malformed => Err(NupackError::Parse {
                tool: operation.name().to_string(),
                source: serde_json::from_str::<Value>("{\"a\":").unwrap_err(),
                raw: "{\"a\":".to_string(),
            }),
        }
    }
}

fn app(runner: Arc<FakeRunner>) -> Router {
    let about = AboutConfig {
        usage: "POST /mfe".to_string(),
        homepage: "https://example.org/nupack-serve".to_string(),
    };
    build_router(AppState::new(Forwarder::new(runner), LICENSE, about))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

fn mfe_body() -> Value {
    json!({
        "number of sequences": "3",
        "target sequence": "ccgggggugaaugugugugagcaugugugugugcauguaccggggaaugaaggu",
        "mir1 sequence": "uccuucauuccaccggagucug",
        "mir2 sequence": "ucucacacagaaaucgcacccgu",
        "permutations": ["1 2 3"],
    })
}

#[tokio::test]
async fn test_about_returns_usage_and_license() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let (status, body) = send(app(runner.clone()), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usage"], "POST /mfe");
    assert_eq!(body["homepage"], "https://example.org/nupack-serve");
    assert_eq!(body["license"], LICENSE);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_post_mfe_wraps_result_in_envelope() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let (status, body) = send(app(runner.clone()), Method::POST, "/mfe", Some(mfe_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "license": LICENSE, "status": 0, "result": { "tool": "mfe" } }));

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Operation::Mfe);
    assert_eq!(
        calls[0].1.responses(),
        vec![
            "3",
            "ccgggggugaaugugugugagcaugugugugugcauguaccggggaaugaaggu",
            "uccuucauuccaccggagucug",
            "ucucacacagaaaucgcacccgu",
            "1 2 3",
        ]
    );
}

#[tokio::test]
async fn test_numeric_count_is_accepted() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let mut body = mfe_body();
    body["number of sequences"] = json!(3);
    let (status, _) = send(app(runner.clone()), Method::POST, "/mfe", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(runner.calls()[0].1.responses()[0], "3");
}

#[tokio::test]
async fn test_mfe_from_path_segments() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let (status, body) = send(app(runner.clone()), Method::GET, "/mfe/ccggg/uccuu/ucuca", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 0);
    assert_eq!(runner.calls()[0].1.responses(), vec!["3", "ccggg", "uccuu", "ucuca", "1 2 3"]);
}

#[tokio::test]
async fn test_missing_field_is_input_error() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let mut body = mfe_body();
    body.as_object_mut().unwrap().remove("mir2 sequence");
    let (status, body) = send(app(runner.clone()), Method::POST, "/mfe", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "input_error");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_input_error() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/complexes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(runner.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_empty_sequence_is_rejected_before_running() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let mut body = mfe_body();
    body["target sequence"] = json!("");
    let (status, body) = send(app(runner.clone()), Method::POST, "/mfe", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "input_error");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_undecodable_path_segment_is_input_error() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let (status, body) = send(app(runner.clone()), Method::GET, "/mfe/%FF/uccuu/ucuca", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "input_error");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_complexes_permutation_count_must_match_strands() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let mut body = mfe_body();
    body["max complex size"] = json!("1");

    for perms in [json!(["1 2 3"]), json!(["1 2 3", "1 2", "1 3", "2 3"])] {
        body["permutations"] = perms;
        let (status, reply) = send(app(runner.clone()), Method::POST, "/complexes", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["error"], "input_error");
    }

    body["permutations"] = json!(["1 2 3", "1 2", "1 3"]);
    let (status, _) = send(app(runner.clone()), Method::POST, "/complexes", Some(body)).await;
    assert_eq!(status, StatusCode::OK);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Operation::Complexes);
    assert_eq!(calls[0].1.len(), 8);
}

#[tokio::test]
async fn test_post_concentrations_sends_every_row() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let body = json!({
        "num complexes": "2",
        "list concentrations": ["1e-7", "1e-6"],
        "temperature": 37.0,
        "ocx": ["1,1,1,0,0,-7.9", "2,1,0,1,0,-9.7"],
    });
    let (status, _) = send(app(runner.clone()), Method::POST, "/concentrations", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let calls = runner.calls();
    assert_eq!(calls[0].0, Operation::Concentrations);
    assert_eq!(
        calls[0].1.responses(),
        vec!["2", "2", "1e-7", "1e-6", "37.0", "1,1,1,0,0,-7.9", "2,1,0,1,0,-9.7"]
    );
}

#[tokio::test]
async fn test_concentrations_rejects_get() {
    let runner = FakeRunner::new(Outcome::Succeed);
    let (status, _) = send(app(runner.clone()), Method::GET, "/concentrations", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_examples_run_their_samples() {
    let runner = FakeRunner::new(Outcome::Succeed);

    let (status, body) = send(app(runner.clone()), Method::GET, "/example/mfe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({ "tool": "mfe" }));

    let (status, _) = send(app(runner.clone()), Method::GET, "/example/complexes", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(runner.clone()), Method::GET, "/example/concentrations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["license"], LICENSE);

    let calls = runner.calls();
    let counts: Vec<(Operation, usize)> = calls.iter().map(|(op, s)| (*op, s.len())).collect();
    assert_eq!(
        counts,
        vec![(Operation::Mfe, 5), (Operation::Complexes, 8), (Operation::Concentrations, 12)]
    );
}

#[tokio::test]
async fn test_tool_timeout_maps_to_gateway_timeout() {
    let runner = FakeRunner::new(Outcome::TimeOut);
    let (status, body) = send(app(runner), Method::POST, "/mfe", Some(mfe_body())).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "interaction_error");
}

#[tokio::test]
async fn test_unparsable_output_maps_to_bad_gateway() {
    let runner = FakeRunner::new(Outcome::Malformed);
    let (status, body) = send(app(runner), Method::GET, "/example/complexes", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "parse_error");
}
