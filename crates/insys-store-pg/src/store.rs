//! [`PgPersonStore`], the Postgres implementation of [`PersonStore`].

use insys_core::{Person, PersonId, PersonInput, store::PersonStore};

use crate::{
  Database, Error, Result,
  encode::{RawPerson, encode_sex},
};

/// Column list for `insys.person` reads.
const PERSON_COLUMNS: &str = "id, full_name, sex::text AS sex, birth_date";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Person repository on top of a [`Database`] gateway.
///
/// Holds no state of its own; cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgPersonStore {
  db: Database,
}

impl PgPersonStore {
  pub fn new(db: Database) -> Self { Self { db } }

  pub fn database(&self) -> &Database { &self.db }
}

/// Mutations address exactly one row by primary key; anything else means the
/// id did not exist.
fn expect_one_row(id: PersonId, rows_affected: u64) -> Result<()> {
  if rows_affected == 1 {
    Ok(())
  } else {
    Err(Error::PersonNotFound(id))
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for PgPersonStore {
  type Error = Error;

  async fn find_all(&self) -> Result<Vec<Person>> {
    let query = format!("SELECT {PERSON_COLUMNS} FROM insys.person");
    let raws = self
      .db
      .fetch_all(sqlx::query_as::<_, RawPerson>(&query))
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn find_one(&self, id: PersonId) -> Result<Person> {
    let query = format!("SELECT {PERSON_COLUMNS} FROM insys.person WHERE id = $1");
    let raws = self
      .db
      .fetch_all(sqlx::query_as::<_, RawPerson>(&query).bind(id))
      .await?;

    raws
      .into_iter()
      .next()
      .ok_or(Error::PersonNotFound(id))?
      .into_person()
  }

  async fn create(&self, input: PersonInput) -> Result<PersonId> {
    let id = self
      .db
      .fetch_scalar_in_transaction(
        sqlx::query_scalar::<_, PersonId>(
          "INSERT INTO insys.person (full_name, sex, birth_date)
           VALUES ($1, $2::insys.sex_trait, $3)
           RETURNING id",
        )
        .bind(input.full_name)
        .bind(encode_sex(input.sex))
        .bind(input.birth_date),
      )
      .await?;

    tracing::debug!(id, "inserted person");
    Ok(id)
  }

  async fn update(&self, id: PersonId, input: PersonInput) -> Result<()> {
    let result = self
      .db
      .execute_in_transaction(
        sqlx::query(
          "UPDATE insys.person
           SET (full_name, sex, birth_date) = ($1, $2::insys.sex_trait, $3)
           WHERE id = $4",
        )
        .bind(input.full_name)
        .bind(encode_sex(input.sex))
        .bind(input.birth_date)
        .bind(id),
      )
      .await?;

    expect_one_row(id, result.rows_affected())
  }

  async fn delete(&self, id: PersonId) -> Result<()> {
    let result = self
      .db
      .execute_in_transaction(
        sqlx::query("DELETE FROM insys.person WHERE id = $1").bind(id),
      )
      .await?;

    expect_one_row(id, result.rows_affected())
  }
}
