use tokio_stream::{wrappers::IntervalStream, StreamExt};
use tracing::info;
use warp::Filter;
use crate::executor;
use super::{with_state, AppState};

pub fn events_route(state: AppState) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
  warp::path!("events")
    .and(warp::get())
    .and(with_state(state))
    .map(handle_events)
}

fn handle_events(state: AppState) -> impl warp::Reply {
  info!("Event stream subscriber connected (every {:?})", state.events_interval);

  let interval = IntervalStream::new(tokio::time::interval(state.events_interval));
  let stream = interval.map(|_| {
    let metrics = executor::system_metrics(&mut rand::thread_rng());
    warp::sse::Event::default()
      .event(metrics.kind.clone())
      .json_data(&metrics)
  });

  warp::sse::reply(warp::sse::keep_alive().stream(stream))
}
