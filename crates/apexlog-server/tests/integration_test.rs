//! End-to-end integration tests for the analysis HTTP API.
//!
//! Tests exercise the full stack: HTTP request -> axum router -> handler ->
//! analysis pipeline -> HTTP response. Requests are sent directly to the
//! router via `tower::ServiceExt::oneshot`, no network server needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::ServiceExt;

use apexlog_server::router::build_router;
use apexlog_server::state::AppState;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_app() -> Router {
    build_router(AppState::default())
}

/// Sends a POST request with a JSON body and returns (status, json).
async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

const SAMPLE_LOG: &str = "\
64.0 APEX_CODE,FINEST;DB,INFO
09:00:00.0 (100)|EXECUTION_STARTED
09:00:00.1 (200)|CODE_UNIT_STARTED|[EXTERNAL]|01qxx|MyTrigger on Account trigger event BeforeInsert
09:00:00.2 (300)|SOQL_EXECUTE_BEGIN|[4]|Aggregations:0|SELECT Id FROM Contact
09:00:00.3 (400)|SOQL_EXECUTE_END|[4]|Rows:7
09:00:00.4 (500)|LIMIT_USAGE|[4]|CPU|9500|10000
09:00:00.5 (600)|CODE_UNIT_FINISHED|MyTrigger on Account trigger event BeforeInsert
09:00:00.6 (700)|EXECUTION_FINISHED
";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_returns_complete_report() {
    let app = test_app();
    let (status, body) = post_json(&app, "/analyze", json!({ "log": SAMPLE_LOG })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let report = &body["report"];
    assert_eq!(report["tree"]["kind"], "root");
    assert_eq!(report["tree"]["children"][0]["identifier"], "execution");
    assert_eq!(
        report["tree"]["children"][0]["children"][0]["kind"],
        "trigger"
    );
    assert_eq!(report["parse_warnings"], json!([]));

    // CPU at 95% of limit produces a warning finding.
    let findings = report["findings"].as_array().unwrap();
    assert!(findings
        .iter()
        .any(|f| f["rule"] == "limit-threshold" && f["severity"] == "warning"));
}

#[tokio::test]
async fn analyze_empty_log_is_bad_request() {
    let app = test_app();
    let (status, body) = post_json(&app, "/analyze", json!({ "log": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "input log text is empty");
}

#[tokio::test]
async fn analyze_honors_request_config() {
    let app = test_app();
    // Lower the warning ratio so a modest CPU reading trips it.
    let (status, body) = post_json(
        &app,
        "/analyze",
        json!({
            "log": "09:00:00.0 (100)|LIMIT_USAGE|[1]|CPU|3000|10000\n",
            "config": { "warning_limit_ratio": 0.25 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let findings = body["report"]["findings"].as_array().unwrap();
    assert!(findings
        .iter()
        .any(|f| f["rule"] == "limit-threshold" && f["severity"] == "warning"));
}

#[tokio::test]
async fn analyze_surfaces_parse_warnings() {
    let app = test_app();
    let log = "not a log line at all\n09:00:00.0 (100)|EXECUTION_STARTED\n09:00:00.1 (200)|EXECUTION_FINISHED\n";
    let (status, body) = post_json(&app, "/analyze", json!({ "log": log })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["report"]["parse_warnings"],
        json!(["line 0: malformed log line"])
    );
}
