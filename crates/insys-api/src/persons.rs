//! Handlers for `/api/person` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/person` | 200 + array, possibly empty |
//! | `POST`   | `/api/person` | Body: [`PersonInput`](insys_core::PersonInput); 201 + `{"id": ...}`, 422 on bad input |
//! | `GET`    | `/api/person/{id}` | 200 + person, 404 if not found |
//! | `PUT`    | `/api/person/{id}` | Body: [`PersonInput`](insys_core::PersonInput); 200, 422 on bad input, 404 if not found |
//! | `DELETE` | `/api/person/{id}` | 204, 404 if not found |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use insys_core::{Person, PersonId, store::PersonStore};
use serde::{Deserialize, Serialize};

use crate::{
  error::ApiError,
  input::{PersonBody, PersonIdPath},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/person`
pub async fn find_all<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
{
  let persons = store.find_all().await.map_err(ApiError::from_store)?;
  tracing::debug!(count = persons.len(), "listed persons");
  Ok(Json(persons))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/person/{id}`
pub async fn find_one<S>(
  State(store): State<Arc<S>>,
  path: PersonIdPath,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let person = store.find_one(path.id()?).await.map_err(ApiError::from_store)?;
  Ok(Json(person))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Body of a `201 Created` answer to `POST /api/person`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub id: PersonId,
}

/// `POST /api/person`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  PersonBody(input): PersonBody,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  let id = store.create(input).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "created person");
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/person/{id}`: replaces every field of [`PersonInput`](insys_core::PersonInput).
///
/// The body is validated before the id is looked at, so a bad payload is a
/// 422 even for an id that does not exist.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  path: PersonIdPath,
  PersonBody(input): PersonBody,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
{
  let id = path.id()?;
  store.update(id, input).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "updated person");
  Ok(StatusCode::OK)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/person/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  path: PersonIdPath,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
{
  let id = path.id()?;
  store.delete(id).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "deleted person");
  Ok(StatusCode::NO_CONTENT)
}
