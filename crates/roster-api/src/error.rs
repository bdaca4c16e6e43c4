//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use roster_enrich::EnrichError;
use serde_json::json;
use thiserror::Error;

/// Methods served on `/persons`, advertised with 405 responses.
const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Unreadable or undecodable request body.
  #[error("{0}")]
  BadRequest(String),

  /// A query parameter or record field failed validation.
  #[error(transparent)]
  Invalid(#[from] roster_core::Error),

  #[error(transparent)]
  Enrichment(#[from] EnrichError),

  /// The store rejected a create, update or delete.
  #[error("store error: {0}")]
  Write(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The store failed to answer a read.
  #[error("store error: {0}")]
  Read(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("method not allowed")]
  MethodNotAllowed,
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_)
      | ApiError::Invalid(_)
      | ApiError::Enrichment(_)
      | ApiError::Write(_) => StatusCode::BAD_REQUEST,
      ApiError::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let mut res = (status, Json(json!({ "error": self.to_string() })))
      .into_response();
    if let ApiError::MethodNotAllowed = self {
      res
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    }
    res
  }
}
