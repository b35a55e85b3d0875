//! Error types for `insys-core`.

use thiserror::Error;

use crate::person::PersonId;

/// Why a person payload was rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("request body is not valid JSON: {0}")]
  MalformedJson(String),

  #[error("request body must be a JSON object")]
  NotAnObject,

  #[error("missing field `{0}`")]
  MissingField(&'static str),

  #[error("field `{0}` must be a non-empty string")]
  EmptyField(&'static str),

  #[error("unknown sex {0:?}, expected \"male\" or \"female\"")]
  UnknownSex(String),

  #[error("unparsable birth date: {0}")]
  InvalidBirthDate(String),
}

/// Every failure a person operation can surface, one variant per kind.
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid person input: {0}")]
  Invalid(#[from] ValidationError),

  #[error("person not found: {0}")]
  NotFound(PersonId),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn is_not_found(&self) -> bool { matches!(self, Error::NotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
