//! Core types and trait definitions for the insys person registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the API layer both depend on it.

pub mod error;
pub mod person;
pub mod store;

pub use error::{Error, Result, ValidationError};
pub use person::{Person, PersonId, PersonInput, Sex};
