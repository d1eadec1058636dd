use tracing::info;
use cybersphere::{config::Config, routes::{routes, AppState}};

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt::init();
  let config = Config::from_env();
  let state = AppState::new(config.events_interval);

  info!("HEX-CyberSphere REST API listening on port {}", config.server_port);
  warp::serve(routes(state))
    .run(([0, 0, 0, 0], config.server_port))
    .await;
}
