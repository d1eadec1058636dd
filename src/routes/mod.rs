use std::convert::Infallible;
use std::time::{Duration, Instant};
use anyhow::anyhow;
use serde_json::{Map, Value};
use tracing::info;
use warp::Filter;
pub mod error;
pub mod operations;
pub mod sse;
pub mod system;
pub mod tasks;

pub const SERVICE_NAME: &str = "HEX-CyberSphere REST API";
const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct AppState {
  pub started_at: Instant,
  pub events_interval: Duration,
}

impl AppState {
  pub fn new(events_interval: Duration) -> Self {
    Self {
      started_at: Instant::now(),
      events_interval,
    }
  }
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
  let api = system::health_route()
    .or(system::status_route(state.clone()))
    .or(tasks::execute_route())
    .or(tasks::history_route())
    .or(operations::scan_route())
    .or(system::logs_route())
    .or(operations::web_route())
    .or(operations::ai_route())
    .or(sse::events_route(state));

  warp::path("api")
    .and(api)
    .recover(error::handle_rejection)
    .with(warp::log::custom(|info| {
      info!(
        "{} {} -> {} ({:?})",
        info.method(),
        info.path(),
        info.status().as_u16(),
        info.elapsed()
      );
    }))
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
  warp::any().map(move || state.clone())
}

fn json_body() -> impl Filter<Extract = (Value,), Error = warp::Rejection> + Clone {
  warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json::<Value>())
}

// Request bodies must be JSON objects, never arrays.
fn object_body(body: Value) -> anyhow::Result<Map<String, Value>> {
  match body {
    Value::Object(map) => Ok(map),
    other => Err(anyhow!("expected a JSON object, got {}", other)),
  }
}
