use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use warp::Filter;
use crate::executor::{self, now_millis};
use super::{with_state, AppState, SERVICE_NAME};

const DEFAULT_LOG_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
  pub limit: Option<i64>,
  pub level: Option<String>,
}

pub fn health_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("health")
    .and(warp::get())
    .map(|| {
      warp::reply::json(&json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": now_millis(),
      }))
    })
}

pub fn status_route(state: AppState) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("status")
    .and(warp::get())
    .and(with_state(state))
    .map(handle_status)
}

fn handle_status(state: AppState) -> impl warp::Reply {
  warp::reply::json(&json!({
    "system": "HEX-CyberSphere",
    "version": env!("CARGO_PKG_VERSION"),
    "runtime": "rust/tokio",
    "uptime": u64::try_from(state.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
    "services": {
      "api_service": "running",
      "task_executor": "ready",
      "database": "connected",
    },
  }))
}

pub fn logs_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("logs")
    .and(warp::get())
    .and(warp::query::<LogsQuery>())
    .map(handle_logs)
}

// `level` is accepted for compatibility; entries are not filtered by it.
fn handle_logs(query: LogsQuery) -> impl warp::Reply {
  let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT);
  let level = query.level.as_deref().unwrap_or("INFO");
  debug!("Generating logs (limit {}, level {})", limit, level);

  let logs = executor::generate_logs(limit, &mut rand::thread_rng());
  warp::reply::json(&json!({
    "status": "success",
    "count": logs.len(),
    "logs": logs,
  }))
}
