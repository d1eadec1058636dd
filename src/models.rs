use serde::{Serialize, Deserialize, Deserializer};
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
  pub task_name: String,
  #[serde(default, deserialize_with = "null_as_empty")]
  pub params: Map<String, Value>,
}

// `"params": null` reads the same as an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `/security/scan`, and the params of a `security_scan` task.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
  pub target: Option<String>,
  pub scan_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
  Completed,
  Failed,
}

#[derive(Debug, Serialize)]
pub struct TaskResult {
  pub task: String,
  pub status: TaskStatus,
  #[serde(flatten)]
  pub details: TaskDetails,
  pub timestamp: i64,
}

/// Fields that vary by task type; flattened next to the common ones.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TaskDetails {
  DataProcessing {
    processed_items: u32,
  },
  SecurityScan {
    target: Option<String>,
    scan_type: Option<String>,
    vulnerabilities: Vec<Vulnerability>,
  },
  WebAutomation {
    actions_executed: u32,
  },
  AiProcessing {
    model_used: String,
    predictions_made: u32,
    confidence: f64,
  },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TaskOutcome {
  Completed(TaskResult),
  Unknown { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vulnerability {
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub port: Option<u16>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub header: Option<String>,
  pub risk: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub id: u32,
  pub name: String,
  pub status: TaskStatus,
  pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
  Info,
  Warn,
  Error,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
  pub id: u32,
  pub level: LogLevel,
  pub message: String,
  pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct MetricsEvent {
  #[serde(rename = "type")]
  pub kind: String,
  pub data: SystemMetrics,
}

#[derive(Debug, Serialize)]
pub struct SystemMetrics {
  pub cpu: f64,
  pub memory: f64,
  pub network: f64,
  pub timestamp: i64,
}
