use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8081;
const DEFAULT_EVENTS_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
  pub server_port: u16,
  pub events_interval: Duration,
  pub api_url: String,
}

impl Config {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| env::var(key).ok())
  }

  fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let events_secs = lookup("EVENTS_INTERVAL_SECS")
      .and_then(|v| v.parse::<u64>().ok())
      .filter(|secs| *secs > 0)
      .unwrap_or(DEFAULT_EVENTS_INTERVAL_SECS);

    Self {
      server_port: lookup("SERVER_PORT")
        .unwrap_or_else(|| DEFAULT_PORT.to_string())
        .parse()
        .unwrap_or(DEFAULT_PORT),
      events_interval: Duration::from_secs(events_secs),
      api_url: lookup("API_URL")
        .unwrap_or_else(|| format!("http://localhost:{}", DEFAULT_PORT)),
    }
  }
}
