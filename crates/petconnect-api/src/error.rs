//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use petconnect_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Every variant renders as `{"success": false, "error": "..."}` with the
/// matching status code, so clients can branch on `success` without parsing
/// the status line.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(String),

  #[error("payment upstream error: {0}")]
  Upstream(String),
}

impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self {
    match &err {
      CoreError::MissingField(_)
      | CoreError::InvalidAmount(_)
      | CoreError::EmptyUpdate => Self::BadRequest(err.to_string()),
      CoreError::UserNotFound(_)
      | CoreError::PetNotFound(_)
      | CoreError::CampaignNotFound(_)
      | CoreError::DonationNotFound(_) => Self::NotFound(err.to_string()),
      CoreError::EmailTaken(_)
      | CoreError::InvalidTransition { .. }
      | CoreError::CampaignStateConflict { .. } => {
        Self::Conflict(err.to_string())
      }
      CoreError::Serialization(_) | CoreError::Store(_) => {
        Self::Store(err.to_string())
      }
    }
  }
}

impl From<petconnect_payments::Error> for ApiError {
  fn from(err: petconnect_payments::Error) -> Self {
    Self::Upstream(err.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Store(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
      ApiError::Upstream(m) => (StatusCode::BAD_GATEWAY, m),
    };
    (status, Json(json!({ "success": false, "error": message })))
      .into_response()
  }
}
