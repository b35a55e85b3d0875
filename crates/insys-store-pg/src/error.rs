//! Error type for `insys-store-pg`.

use insys_core::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// A row came back with a value the domain model cannot represent.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

impl From<Error> for insys_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::PersonNotFound(id) => insys_core::Error::NotFound(id),
      other => insys_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
