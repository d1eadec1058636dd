use anyhow::Context;
use serde_json::{json, Value};
use tracing::info;
use warp::Filter;
use crate::executor;
use crate::models::ScanRequest;
use super::{error::reject, json_body, object_body};

pub fn scan_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("security" / "scan")
    .and(warp::post())
    .and(json_body())
    .and_then(handle_scan)
}

pub fn web_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("web" / "automate")
    .and(warp::post())
    .and(json_body())
    .and_then(handle_web_automation)
}

pub fn ai_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("ai" / "process")
    .and(warp::post())
    .and(json_body())
    .and_then(handle_ai_processing)
}

async fn handle_scan(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
  let request: ScanRequest = object_body(body)
    .and_then(|map| serde_json::from_value(Value::Object(map)).context("invalid scan request"))
    .map_err(|e| reject("Security scan", e))?;

  info!(
    "Scanning {} ({})",
    request.target.as_deref().unwrap_or("<none>"),
    request.scan_type.as_deref().unwrap_or("<none>")
  );
  let result = executor::security_scan(request.target.as_deref(), request.scan_type.as_deref());

  Ok(warp::reply::json(&json!({
    "status": "success",
    "target": request.target,
    "scan_type": request.scan_type,
    "result": result,
  })))
}

async fn handle_web_automation(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
  let params = object_body(body).map_err(|e| reject("Web automation", e))?;
  info!("Running web automation with {} parameter(s)", params.len());
  let result = executor::web_automation(&mut rand::thread_rng());

  Ok(warp::reply::json(&json!({
    "status": "success",
    "result": result,
  })))
}

async fn handle_ai_processing(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
  let params = object_body(body).map_err(|e| reject("AI processing", e))?;
  info!("Running AI processing with {} parameter(s)", params.len());
  let result = executor::ai_processing(&mut rand::thread_rng());

  Ok(warp::reply::json(&json!({
    "status": "success",
    "result": result,
  })))
}
