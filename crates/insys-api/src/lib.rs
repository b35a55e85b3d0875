//! JSON REST API for the insys person registry.
//!
//! Exposes an axum [`Router`] backed by any [`insys_core::store::PersonStore`].
//! Listener, TLS and process lifecycle are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, insys_api::api_router(Arc::new(store))).await?;
//! ```

pub mod error;
pub mod input;
pub mod persons;

use std::{any::Any, sync::Arc};

use axum::{
  Router,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::get,
};
use insys_core::store::PersonStore;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// Unknown paths and unsupported methods on known paths both answer `404`
/// with an empty body. `HEAD` is one of those; axum would otherwise answer it
/// through the `GET` handler. A handler that panics answers `500`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    .route(
      "/api/person",
      get(persons::find_all::<S>)
        .post(persons::create::<S>)
        .head(not_found)
        .fallback(not_found),
    )
    .route(
      "/api/person/{id}",
      get(persons::find_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete::<S>)
        .head(not_found)
        .fallback(not_found),
    )
    .fallback(not_found)
    .layer(CatchPanicLayer::custom(panic_response))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

async fn not_found() -> StatusCode { StatusCode::NOT_FOUND }

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
  let message = err
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| err.downcast_ref::<&str>().copied())
    .unwrap_or("unknown panic");
  tracing::error!("handler panicked: {message}");
  StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
