use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{info, warn};
use crate::models::{
  HistoryEntry, LogEntry, LogLevel, MetricsEvent, ScanRequest, SystemMetrics, TaskDetails, TaskOutcome,
  TaskResult, TaskStatus, Vulnerability,
};

pub const MAX_LOG_ENTRIES: usize = 20;
const HISTORY_SIZE: u32 = 10;
const HOUR_MS: i64 = 3_600_000;
const MINUTE_MS: i64 = 60_000;

const LOG_LEVELS: [LogLevel; 3] = [LogLevel::Info, LogLevel::Warn, LogLevel::Error];
const LOG_MESSAGES: [&str; 5] = [
  "System started successfully",
  "Task executed successfully",
  "Security scan completed",
  "Web automation in progress",
  "AI processing completed",
];

pub fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

/// Fails only when a task's params have the wrong shape.
pub fn execute<R: Rng + ?Sized>(
  task_name: &str,
  params: &Map<String, Value>,
  rng: &mut R,
) -> Result<TaskOutcome> {
  let result = match task_name {
    "data_processing" => process_data(rng),
    "security_scan" => {
      let scan: ScanRequest = serde_json::from_value(Value::Object(params.clone()))
        .context("invalid security_scan params")?;
      security_scan(scan.target.as_deref(), scan.scan_type.as_deref())
    }
    "web_automation" => web_automation(rng),
    "ai_analysis" => ai_processing(rng),
    other => {
      warn!("Unknown task requested: {}", other);
      return Ok(TaskOutcome::Unknown { error: format!("Unknown task: {}", other) });
    }
  };
  info!("Task {} completed", task_name);
  Ok(TaskOutcome::Completed(result))
}

fn completed(task: &str, details: TaskDetails) -> TaskResult {
  TaskResult {
    task: task.to_string(),
    status: TaskStatus::Completed,
    details,
    timestamp: now_millis(),
  }
}

pub fn process_data<R: Rng + ?Sized>(rng: &mut R) -> TaskResult {
  completed("data_processing", TaskDetails::DataProcessing {
    processed_items: rng.gen_range(100..1000),
  })
}

pub fn security_scan(target: Option<&str>, scan_type: Option<&str>) -> TaskResult {
  let vulnerabilities = if scan_type == Some("full") {
    vec![
      Vulnerability {
        kind: "open_port".into(),
        port: Some(22),
        header: None,
        risk: "medium".into(),
      },
      Vulnerability {
        kind: "missing_header".into(),
        port: None,
        header: Some("X-Content-Type-Options".into()),
        risk: "low".into(),
      },
    ]
  } else {
    vec![]
  };

  completed("security_scan", TaskDetails::SecurityScan {
    target: target.map(str::to_string),
    scan_type: scan_type.map(str::to_string),
    vulnerabilities,
  })
}

pub fn web_automation<R: Rng + ?Sized>(rng: &mut R) -> TaskResult {
  completed("web_automation", TaskDetails::WebAutomation {
    actions_executed: rng.gen_range(5..20),
  })
}

pub fn ai_processing<R: Rng + ?Sized>(rng: &mut R) -> TaskResult {
  completed("ai_processing", TaskDetails::AiProcessing {
    model_used: "RandomForestClassifier".into(),
    predictions_made: rng.gen_range(10..100),
    confidence: rng.gen_range(0.8..0.99),
  })
}

pub fn task_history() -> Vec<HistoryEntry> {
  let now = now_millis();
  (0..HISTORY_SIZE)
    .map(|i| HistoryEntry {
      id: i + 1,
      name: format!("sample_task_{}", i + 1),
      status: if i % 3 == 0 { TaskStatus::Failed } else { TaskStatus::Completed },
      timestamp: now - i64::from(i) * HOUR_MS,
    })
    .collect()
}

/// Negative limits yield no entries; anything above the cap is clamped.
pub fn generate_logs<R: Rng + ?Sized>(limit: i64, rng: &mut R) -> Vec<LogEntry> {
  let count = limit.clamp(0, MAX_LOG_ENTRIES as i64) as u32;
  let now = now_millis();
  (0..count)
    .map(|i| LogEntry {
      id: i + 1,
      level: LOG_LEVELS[rng.gen_range(0..LOG_LEVELS.len())],
      message: LOG_MESSAGES[rng.gen_range(0..LOG_MESSAGES.len())].to_string(),
      timestamp: now - i64::from(i) * MINUTE_MS,
    })
    .collect()
}

pub fn system_metrics<R: Rng + ?Sized>(rng: &mut R) -> MetricsEvent {
  MetricsEvent {
    kind: "system_metrics".into(),
    data: SystemMetrics {
      cpu: rng.gen_range(0.0..100.0),
      memory: rng.gen_range(0.0..100.0),
      network: rng.gen_range(0.0..1000.0),
      timestamp: now_millis(),
    },
  }
}
