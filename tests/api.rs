use std::time::Duration;
use serde_json::{json, Value};
use warp::http::StatusCode;
use cybersphere::routes::{routes, AppState};

fn state() -> AppState {
  AppState::new(Duration::from_secs(1))
}

async fn get(path: &str) -> (StatusCode, Value) {
  let response = warp::test::request()
    .method("GET")
    .path(path)
    .reply(&routes(state()))
    .await;
  let body = serde_json::from_slice(response.body()).unwrap();
  (response.status(), body)
}

async fn post(path: &str, body: &Value) -> (StatusCode, Value) {
  let response = warp::test::request()
    .method("POST")
    .path(path)
    .json(body)
    .reply(&routes(state()))
    .await;
  let body = serde_json::from_slice(response.body()).unwrap();
  (response.status(), body)
}

#[tokio::test]
async fn health_is_always_healthy() {
  let (status, body) = get("/api/health").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "healthy");
  assert!(body["service"].is_string());
  assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn status_reports_services() {
  let (status, body) = get("/api/status").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["system"], "HEX-CyberSphere");
  assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
  assert!(body["uptime"].is_u64());
  assert_eq!(body["services"]["api_service"], "running");
  assert_eq!(body["services"]["task_executor"], "ready");
}

#[tokio::test]
async fn execute_data_processing() {
  let (status, body) = post(
    "/api/tasks/execute",
    &json!({"task_name": "data_processing", "params": {}}),
  ).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "success");
  assert_eq!(body["task_name"], "data_processing");
  assert_eq!(body["result"]["task"], "data_processing");
  assert_eq!(body["result"]["status"], "completed");
  let items = body["result"]["processed_items"].as_u64().unwrap();
  assert!((100..1000).contains(&items));
  assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn execute_security_scan_uses_params() {
  let (status, body) = post(
    "/api/tasks/execute",
    &json!({"task_name": "security_scan", "params": {"target": "10.0.0.5", "scan_type": "full"}}),
  ).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["result"]["target"], "10.0.0.5");
  assert_eq!(body["result"]["vulnerabilities"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn execute_ai_analysis() {
  let (status, body) = post("/api/tasks/execute", &json!({"task_name": "ai_analysis"})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["result"]["model_used"], "RandomForestClassifier");
  let confidence = body["result"]["confidence"].as_f64().unwrap();
  assert!((0.8..0.99).contains(&confidence));
}

#[tokio::test]
async fn execute_unknown_task_is_wrapped_in_success() {
  let (status, body) = post(
    "/api/tasks/execute",
    &json!({"task_name": "teleport", "params": {}}),
  ).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "success");
  assert_eq!(body["result"]["error"], "Unknown task: teleport");
}

#[tokio::test]
async fn execute_without_task_name_fails() {
  let (status, body) = post("/api/tasks/execute", &json!({"params": {}})).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["status"], "error");
  assert!(body["message"].as_str().unwrap().starts_with("Task execution failed:"));
}

#[tokio::test]
async fn execute_security_scan_rejects_non_string_target() {
  let (status, body) = post(
    "/api/tasks/execute",
    &json!({"task_name": "security_scan", "params": {"target": 42, "scan_type": "full"}}),
  ).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body["status"], "error");
  assert!(body["message"].as_str().unwrap().starts_with("Task execution failed:"));
}

#[tokio::test]
async fn execute_with_null_params_succeeds() {
  let (status, body) = post(
    "/api/tasks/execute",
    &json!({"task_name": "data_processing", "params": null}),
  ).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "success");
  assert_eq!(body["result"]["task"], "data_processing");
}

#[tokio::test]
async fn execute_requires_object_body() {
  let (status, body) = post("/api/tasks/execute", &json!(["data_processing"])).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["message"].as_str().unwrap().starts_with("Task execution failed:"));
}

#[tokio::test]
async fn scan_requires_object_body() {
  let (status, body) = post("/api/security/scan", &json!(["host", "full"])).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["message"].as_str().unwrap().starts_with("Security scan failed:"));
}

#[tokio::test]
async fn history_marks_every_third_task_failed() {
  let (status, body) = get("/api/tasks/history").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["count"], 10);
  let history = body["history"].as_array().unwrap();
  assert_eq!(history.len(), 10);
  for (i, entry) in history.iter().enumerate() {
    let expected = if [0, 3, 6, 9].contains(&i) { "failed" } else { "completed" };
    assert_eq!(entry["status"], expected, "entry {}", i);
  }
}

#[tokio::test]
async fn full_scan_returns_two_vulnerabilities() {
  let (status, body) = post(
    "/api/security/scan",
    &json!({"target": "example.com", "scan_type": "full"}),
  ).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "success");
  assert_eq!(body["target"], "example.com");
  assert_eq!(body["scan_type"], "full");
  assert_eq!(body["result"]["vulnerabilities"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn other_scans_return_no_vulnerabilities() {
  for scan_type in ["quick", "ports", ""] {
    let (_, body) = post(
      "/api/security/scan",
      &json!({"target": "example.com", "scan_type": scan_type}),
    ).await;
    assert_eq!(body["result"]["vulnerabilities"], json!([]));
  }
}

#[tokio::test]
async fn scan_with_wrong_field_type_fails() {
  let (status, body) = post("/api/security/scan", &json!({"target": 42})).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["message"].as_str().unwrap().starts_with("Security scan failed:"));
}

#[tokio::test]
async fn logs_respect_limit_and_cap() {
  let (_, body) = get("/api/logs?limit=5").await;
  assert_eq!(body["logs"].as_array().unwrap().len(), 5);
  assert_eq!(body["count"], 5);

  let (_, body) = get("/api/logs?limit=50").await;
  assert_eq!(body["logs"].as_array().unwrap().len(), 20);

  let (_, body) = get("/api/logs?level=ERROR").await;
  assert_eq!(body["logs"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn logs_reject_non_numeric_limit() {
  let (status, body) = get("/api/logs?limit=lots").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn web_automation_counts_actions() {
  let (status, body) = post("/api/web/automate", &json!({"url": "https://example.com"})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["result"]["task"], "web_automation");
  let actions = body["result"]["actions_executed"].as_u64().unwrap();
  assert!((5..20).contains(&actions));
}

#[tokio::test]
async fn ai_processing_reports_predictions() {
  let (status, body) = post("/api/ai/process", &json!({"dataset": "sample"})).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["result"]["task"], "ai_processing");
  let predictions = body["result"]["predictions_made"].as_u64().unwrap();
  assert!((10..100).contains(&predictions));
}

#[tokio::test]
async fn ai_processing_requires_object_body() {
  let (status, body) = post("/api/ai/process", &json!([1, 2, 3])).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["message"].as_str().unwrap().starts_with("AI processing failed:"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
  let (status, body) = get("/api/nothing-here").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn wrong_method_is_rejected() {
  let (status, _) = get("/api/tasks/execute").await;
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn serves_over_http() {
  let (addr, server) = warp::serve(routes(state())).bind_ephemeral(([127, 0, 0, 1], 0));
  tokio::spawn(server);
  let client = reqwest::Client::new();

  let health: Value = client
    .get(format!("http://{}/api/health", addr))
    .send()
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
  assert_eq!(health["status"], "healthy");

  let mut events = client
    .get(format!("http://{}/api/events", addr))
    .send()
    .await
    .unwrap();
  assert_eq!(events.headers()["content-type"], "text/event-stream");
  let chunk = tokio::time::timeout(Duration::from_secs(5), events.chunk())
    .await
    .unwrap()
    .unwrap()
    .unwrap();
  let text = String::from_utf8_lossy(&chunk);
  assert!(text.contains("event:system_metrics"));
  assert!(text.contains("\"cpu\""));
}
