use std::convert::Infallible;
use serde_json::json;
use tracing::error;
use warp::http::StatusCode;

/// A handler failure, reported to the client as a 500 envelope.
#[derive(Debug)]
pub struct ApiError {
  pub message: String,
}
impl warp::reject::Reject for ApiError {}

impl ApiError {
  pub fn new(operation: &str, err: anyhow::Error) -> Self {
    Self {
      message: format!("{} failed: {:#}", operation, err),
    }
  }
}

pub fn reject(operation: &str, err: anyhow::Error) -> warp::Rejection {
  let api_error = ApiError::new(operation, err);
  error!("{}", api_error.message);
  warp::reject::custom(api_error)
}

pub fn error_reply(status: StatusCode, message: &str) -> warp::reply::WithStatus<warp::reply::Json> {
  warp::reply::with_status(
    warp::reply::json(&json!({"status": "error", "message": message})),
    status,
  )
}

pub async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
  let (status, message) = if err.is_not_found() {
    (StatusCode::NOT_FOUND, "Not Found".to_string())
  } else if let Some(e) = err.find::<ApiError>() {
    (StatusCode::INTERNAL_SERVER_ERROR, e.message.clone())
  } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
    (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
  } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
    (StatusCode::BAD_REQUEST, format!("Invalid query: {}", e))
  } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
    (StatusCode::BAD_REQUEST, "Request body must be JSON".to_string())
  } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
    (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large".to_string())
  } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
  } else {
    error!("Unhandled rejection: {:?}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
  };

  Ok(error_reply(status, &message))
}
