//! The `PersonStore` trait.
//!
//! Implemented by storage backends (e.g. `insys-store-pg`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::person::{Person, PersonId, PersonInput};

/// Abstraction over a person repository.
///
/// Implementations hold no per-request state. Each method performs a single
/// interaction with the backing store; every mutation is atomic on its own.
///
/// `NotFound` conditions must surface as an error that converts into
/// [`crate::Error::NotFound`], so callers can tell them apart from backend
/// failures without knowing the backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  /// Every stored person, in the store's native order. May be empty.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// The person with `id`, or a not-found error.
  fn find_one(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Persist a new person and return the id the store assigned to it.
  fn create(
    &self,
    input: PersonInput,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + '_;

  /// Replace all mutable fields of the person with `id`.
  ///
  /// Fails with not-found unless exactly one row was affected.
  fn update(
    &self,
    id: PersonId,
    input: PersonInput,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the person with `id`.
  ///
  /// Fails with not-found unless exactly one row was affected.
  fn delete(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
