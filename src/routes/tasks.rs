use anyhow::Context;
use serde_json::{json, Value};
use tracing::info;
use warp::Filter;
use crate::executor::{self, now_millis};
use crate::models::{TaskOutcome, TaskRequest};
use super::{error::reject, json_body, object_body};

pub fn execute_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("tasks" / "execute")
    .and(warp::post())
    .and(json_body())
    .and_then(handle_execute)
}

pub fn history_route() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("tasks" / "history")
    .and(warp::get())
    .map(|| {
      let history = executor::task_history();
      warp::reply::json(&json!({
        "status": "success",
        "count": history.len(),
        "history": history,
      }))
    })
}

/// Runs the dispatch on the blocking pool and waits for it.
pub async fn run_task(request: TaskRequest) -> anyhow::Result<TaskOutcome> {
  tokio::task::spawn_blocking(move || {
    executor::execute(&request.task_name, &request.params, &mut rand::thread_rng())
  })
    .await
    .context("task worker did not complete")?
}

async fn handle_execute(body: Value) -> Result<impl warp::Reply, warp::Rejection> {
  let request: TaskRequest = object_body(body)
    .and_then(|map| serde_json::from_value(Value::Object(map)).context("invalid task request"))
    .map_err(|e| reject("Task execution", e))?;

  let task_name = request.task_name.clone();
  info!("Executing task {}", task_name);
  let result = run_task(request)
    .await
    .map_err(|e| reject("Task execution", e))?;

  Ok(warp::reply::json(&json!({
    "status": "success",
    "task_name": task_name,
    "result": result,
    "timestamp": now_millis(),
  })))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Map;

  fn request(task_name: &str) -> TaskRequest {
    TaskRequest {
      task_name: task_name.to_string(),
      params: Map::new(),
    }
  }

  #[test]
  fn test_run_task_completes() {
    let outcome = tokio_test::block_on(run_task(request("web_automation"))).unwrap();
    let value = serde_json::to_value(outcome).unwrap();
    assert_eq!(value["task"], "web_automation");
    assert_eq!(value["status"], "completed");
  }

  #[test]
  fn test_run_task_unknown() {
    let outcome = tokio_test::block_on(run_task(request("nope"))).unwrap();
    assert!(matches!(outcome, TaskOutcome::Unknown { ref error } if error == "Unknown task: nope"));
  }

  #[test]
  fn test_run_task_surfaces_bad_params() {
    let request = TaskRequest {
      task_name: "security_scan".to_string(),
      params: json!({"scan_type": ["full"]}).as_object().unwrap().clone(),
    };
    assert!(tokio_test::block_on(run_task(request)).is_err());
  }

  #[test]
  fn test_null_params_read_as_empty() {
    let request: TaskRequest = serde_json::from_value(json!({"task_name": "data_processing", "params": null})).unwrap();
    assert!(request.params.is_empty());
  }

  #[test]
  fn test_missing_params_default_to_empty() {
    let request: TaskRequest = serde_json::from_value(json!({"task_name": "data_processing"})).unwrap();
    assert!(request.params.is_empty());
  }
}
