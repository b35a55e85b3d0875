//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error response has an empty body; the status code is the whole
//! answer. Details go to the log instead.

use axum::{
  extract::rejection::BytesRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use insys_core::ValidationError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unprocessable entity: {0}")]
  Unprocessable(#[from] ValidationError),

  #[error("not found: {0}")]
  NotFound(String),

  /// The request body could not be read at all (too large, connection
  /// dropped).
  #[error("body error: {0}")]
  Body(#[from] BytesRejection),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Convert any store error, keeping not-found distinguishable.
  pub fn from_store<E: Into<insys_core::Error>>(e: E) -> Self {
    Self::from(e.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Body(rejection) => rejection.status(),
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<insys_core::Error> for ApiError {
  fn from(e: insys_core::Error) -> Self {
    match e {
      insys_core::Error::Invalid(v) => ApiError::Unprocessable(v),
      insys_core::Error::NotFound(id) => {
        ApiError::NotFound(format!("person {id} not found"))
      }
      insys_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      ApiError::Store(_) => tracing::error!("{self}"),
      ApiError::NotFound(_) => tracing::debug!("{self}"),
      ApiError::Unprocessable(_) | ApiError::Body(_) => tracing::warn!("{self}"),
    }
    status.into_response()
  }
}
