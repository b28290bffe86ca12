//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Not found")]
  NotFound,

  #[error("Missing required fields")]
  MissingFields,

  #[error("multipart error: {0}")]
  Multipart(#[from] MultipartError),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
      ApiError::MissingFields => (StatusCode::BAD_REQUEST, self.to_string()),
      ApiError::Multipart(e) => (e.status(), e.body_text()),
      ApiError::Io(_) | ApiError::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
