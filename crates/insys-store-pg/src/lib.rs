//! PostgreSQL backend for the insys person registry.
//!
//! [`Database`] is the gateway: it owns the connection pool and knows how to
//! run statements, but nothing about people. [`PgPersonStore`] is the
//! repository that turns person operations into SQL on top of it.

mod encode;
mod gateway;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use gateway::{Database, DatabaseConfig};
pub use store::PgPersonStore;

#[cfg(test)]
mod tests;
