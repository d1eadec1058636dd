//! HTTP client and state snapshot behind the terminal dashboard.

use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{info, warn};
use crate::models::{HistoryEntry, LogEntry};

static MAX_RETRIES: usize = 5;
static REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const LOG_FETCH_LIMIT: u32 = 20;

pub const TASK_NAMES: [&str; 4] = ["data_processing", "security_scan", "web_automation", "ai_analysis"];

pub struct ApiClient {
  client: reqwest::Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api/{}", self.base_url, path)
  }

  // 100ms, 200ms, 400ms, ... so a server that is still starting gets picked up.
  async fn get_json(&self, path: &str) -> Result<Value> {
    let url = self.url(path);
    let strategy = ExponentialBackoff::from_millis(2).factor(50).take(MAX_RETRIES);
    let response = Retry::spawn(strategy, || async {
      self.client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
    })
      .await
      .with_context(|| format!("GET {} failed", url))?;

    response
      .json::<Value>()
      .await
      .with_context(|| format!("invalid JSON from {}", url))
  }

  pub async fn status(&self) -> Result<Value> {
    self.get_json("status").await
  }

  pub async fn history(&self) -> Result<Value> {
    self.get_json("tasks/history").await
  }

  pub async fn logs(&self, limit: u32) -> Result<Value> {
    self.get_json(&format!("logs?limit={}", limit)).await
  }

  pub async fn execute(&self, task_name: &str) -> Result<Value> {
    let url = self.url("tasks/execute");
    info!("Requesting execution of {}", task_name);
    let response = self.client
      .post(&url)
      .json(&json!({"task_name": task_name, "params": default_params(task_name)}))
      .send()
      .await
      .with_context(|| format!("POST {} failed", url))?;

    let status = response.status();
    let body = response
      .json::<Value>()
      .await
      .with_context(|| format!("invalid JSON from {}", url))?;
    if !status.is_success() {
      warn!("Execution of {} returned {}", task_name, status);
    }
    Ok(body)
  }

  pub async fn snapshot(&self) -> Result<DashboardState> {
    let (status, history, logs) = futures::try_join!(
      self.status(),
      self.history(),
      self.logs(LOG_FETCH_LIMIT)
    )?;
    DashboardState::from_responses(&status, &history, &logs)
  }
}

fn default_params(task_name: &str) -> Value {
  match task_name {
    "security_scan" => json!({"target": "localhost", "scan_type": "full"}),
    _ => json!({}),
  }
}

#[derive(Debug, Default)]
pub struct DashboardState {
  pub system: String,
  pub version: String,
  pub uptime_ms: u64,
  pub services: Vec<(String, String)>,
  pub history: Vec<HistoryEntry>,
  pub logs: Vec<LogEntry>,
}

impl DashboardState {
  pub fn from_responses(status: &Value, history: &Value, logs: &Value) -> Result<Self> {
    let mut services: Vec<(String, String)> = status
      .get("services")
      .and_then(Value::as_object)
      .map(|map| {
        map
          .iter()
          .map(|(name, state)| (name.clone(), state.as_str().unwrap_or("unknown").to_string()))
          .collect()
      })
      .unwrap_or_default();
    services.sort();

    let history = history
      .get("history")
      .cloned()
      .ok_or_else(|| anyhow!("history response has no 'history' field"))?;
    let logs = logs
      .get("logs")
      .cloned()
      .ok_or_else(|| anyhow!("logs response has no 'logs' field"))?;

    Ok(Self {
      system: status.get("system").and_then(Value::as_str).unwrap_or("unknown").to_string(),
      version: status.get("version").and_then(Value::as_str).unwrap_or("unknown").to_string(),
      uptime_ms: status.get("uptime").and_then(Value::as_u64).unwrap_or(0),
      services,
      history: serde_json::from_value(history).context("malformed task history")?,
      logs: serde_json::from_value(logs).context("malformed log entries")?,
    })
  }
}

/// One-line summary of a `/tasks/execute` response.
pub fn summarize_execution(response: &Value) -> String {
  if response.get("status").and_then(Value::as_str) == Some("error") {
    let message = response.get("message").and_then(Value::as_str).unwrap_or("unknown error");
    return format!("error: {}", message);
  }

  let task_name = response.get("task_name").and_then(Value::as_str).unwrap_or("?");
  let result = match response.get("result").and_then(Value::as_object) {
    Some(result) => result,
    None => return format!("{}: no result", task_name),
  };
  if let Some(error) = result.get("error").and_then(Value::as_str) {
    return format!("{}: {}", task_name, error);
  }

  let status = result.get("status").and_then(Value::as_str).unwrap_or("?");
  let mut fields: Vec<String> = result
    .iter()
    .filter(|(key, _)| !matches!(key.as_str(), "task" | "status" | "timestamp"))
    .map(|(key, value)| match value {
      Value::Array(items) => format!("{}={}", key, items.len()),
      Value::String(s) => format!("{}={}", key, s),
      other => format!("{}={}", key, other),
    })
    .collect();
  fields.sort();
  format!("{}: {} ({})", task_name, status, fields.join(", "))
}
