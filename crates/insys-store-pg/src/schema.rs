//! SQL schema for the insys Postgres store.
//!
//! Executed once at startup. Every statement tolerates an already-initialised
//! database.

/// Full schema DDL. Runs through the simple query protocol, so it may hold
/// several statements.
pub const SCHEMA: &str = "
CREATE SCHEMA IF NOT EXISTS insys;

-- Postgres has no CREATE TYPE IF NOT EXISTS.
DO
$$
    BEGIN
        CREATE TYPE insys.sex_trait AS ENUM ('male', 'female');
    EXCEPTION
        WHEN duplicate_object THEN null;
    END
$$;

CREATE TABLE IF NOT EXISTS insys.person
(
    id         SERIAL PRIMARY KEY,
    full_name  TEXT            NOT NULL,
    sex        insys.sex_trait NOT NULL,
    birth_date TIMESTAMPTZ     NOT NULL
);
";

/// SQLSTATE codes raised when two initialisers race on the same definition.
///
/// `42P06` duplicate_schema, `42710` duplicate_object, `42P07`
/// duplicate_table, `23505` unique_violation (on the `pg_type`/`pg_namespace`
/// catalogs).
pub const DUPLICATE_DEFINITION_CODES: &[&str] = &["42P06", "42710", "42P07", "23505"];

/// Whether `err` only says the object we tried to create already exists.
pub fn is_duplicate_definition(err: &sqlx::Error) -> bool {
  err
    .as_database_error()
    .and_then(|db| db.code())
    .is_some_and(|code| DUPLICATE_DEFINITION_CODES.contains(&&*code))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn non_database_errors_are_not_duplicate_definitions() {
    assert!(!is_duplicate_definition(&sqlx::Error::RowNotFound));
    assert!(!is_duplicate_definition(&sqlx::Error::PoolTimedOut));
  }
}
