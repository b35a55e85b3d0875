//! Encoding and decoding helpers between Rust domain types and the column
//! representations used in Postgres.
//!
//! `sex` travels as text in both directions: bound parameters are cast to
//! `insys.sex_trait` in SQL, and selected values are cast back with
//! `sex::text`. That keeps the enum type out of the Rust side entirely.

use chrono::{DateTime, Utc};
use insys_core::{Person, PersonId, Sex};

use crate::{Error, Result};

// ─── Sex ─────────────────────────────────────────────────────────────────────

pub fn encode_sex(sex: Sex) -> &'static str { sex.as_str() }

pub fn decode_sex(s: &str) -> Result<Sex> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown sex_trait value: {s:?}")))
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A `person` row, selected with `sex` already cast to text.
#[derive(Debug, sqlx::FromRow)]
pub struct RawPerson {
  pub id:         PersonId,
  pub full_name:  String,
  pub sex:        String,
  pub birth_date: DateTime<Utc>,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:         self.id,
      full_name:  self.full_name,
      sex:        decode_sex(&self.sex)?,
      birth_date: self.birth_date,
    })
  }
}
