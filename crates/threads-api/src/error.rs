//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("service error: {0}")]
  Service(#[source] threads_service::Error),
}

impl From<threads_service::Error> for ApiError {
  fn from(e: threads_service::Error) -> Self {
    if e.is_not_found() {
      ApiError::NotFound(e.to_string())
    } else if e.is_conflict() {
      ApiError::Conflict(e.to_string())
    } else if let threads_service::Error::Invalid(msg) = e {
      ApiError::BadRequest(msg)
    } else {
      ApiError::Service(e)
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Service(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
