//! Integration tests for `PgPersonStore` against a real Postgres server.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL`.
//! Run with: DATABASE_URL=postgres://... cargo test -p insys-store-pg -- --ignored

use chrono::{TimeZone, Utc};
use insys_core::{PersonInput, Sex, store::PersonStore};
use sqlx::PgPool;

use crate::{Database, Error, PgPersonStore};

async fn store(pool: PgPool) -> PgPersonStore {
  let db = Database::from_pool(pool);
  db.init_schema().await.expect("schema init");
  PgPersonStore::new(db)
}

fn john() -> PersonInput {
  PersonInput {
    full_name:  "John Doe".into(),
    sex:        Sex::Male,
    birth_date: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
  }
}

fn changed() -> PersonInput {
  PersonInput {
    full_name:  "Changed".into(),
    sex:        Sex::Female,
    birth_date: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
  }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

#[sqlx::test]
#[ignore = "requires database"]
async fn init_schema_is_idempotent(pool: PgPool) {
  let db = Database::from_pool(pool);
  db.init_schema().await.unwrap();
  db.init_schema().await.unwrap();
  db.ping().await.unwrap();
}

#[sqlx::test]
#[ignore = "requires database"]
async fn concurrent_init_schema_both_succeed(pool: PgPool) {
  let a = Database::from_pool(pool.clone());
  let b = Database::from_pool(pool);
  let (first, second) = tokio::join!(a.init_schema(), b.init_schema());
  first.unwrap();
  second.unwrap();

  let s = PgPersonStore::new(a);
  s.create(john()).await.unwrap();
  assert_eq!(s.find_all().await.unwrap().len(), 1);
}

#[sqlx::test]
#[ignore = "requires database"]
async fn failed_statement_rolls_back(pool: PgPool) {
  let s = store(pool).await;
  let id = s.create(john()).await.unwrap();

  // The cast to sex_trait fails after the row was matched.
  let err = s
    .database()
    .execute_in_transaction(
      sqlx::query(
        "UPDATE insys.person SET full_name = 'Nope', sex = $1::insys.sex_trait WHERE id = $2",
      )
      .bind("malformed")
      .bind(id),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Database(_)));

  let person = s.find_one(id).await.unwrap();
  assert_eq!(person.full_name, "John Doe");
}

// ─── Repository ──────────────────────────────────────────────────────────────

#[sqlx::test]
#[ignore = "requires database"]
async fn find_all_on_empty_table_returns_empty_vec(pool: PgPool) {
  let s = store(pool).await;
  assert!(s.find_all().await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires database"]
async fn create_and_find_one(pool: PgPool) {
  let s = store(pool).await;

  let id = s.create(john()).await.unwrap();
  let person = s.find_one(id).await.unwrap();

  assert_eq!(person.id, id);
  assert_eq!(person.to_input(), john());
}

#[sqlx::test]
#[ignore = "requires database"]
async fn create_assigns_distinct_ids(pool: PgPool) {
  let s = store(pool).await;

  let a = s.create(john()).await.unwrap();
  let b = s.create(changed()).await.unwrap();
  assert_ne!(a, b);

  let all = s.find_all().await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().any(|p| p.id == a));
  assert!(all.iter().any(|p| p.id == b));
}

#[sqlx::test]
#[ignore = "requires database"]
async fn find_one_missing_is_not_found(pool: PgPool) {
  let s = store(pool).await;
  let err = s.find_one(4242).await.unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(4242)));
  assert!(insys_core::Error::from(err).is_not_found());
}

#[sqlx::test]
#[ignore = "requires database"]
async fn update_replaces_every_field(pool: PgPool) {
  let s = store(pool).await;
  let id = s.create(john()).await.unwrap();

  s.update(id, changed()).await.unwrap();

  let person = s.find_one(id).await.unwrap();
  assert_eq!(person.to_input(), changed());
}

#[sqlx::test]
#[ignore = "requires database"]
async fn update_missing_is_not_found(pool: PgPool) {
  let s = store(pool).await;
  let err = s.update(4242, changed()).await.unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(4242)));
}

#[sqlx::test]
#[ignore = "requires database"]
async fn delete_removes_row(pool: PgPool) {
  let s = store(pool).await;
  let id = s.create(john()).await.unwrap();

  s.delete(id).await.unwrap();

  assert!(matches!(
    s.find_one(id).await.unwrap_err(),
    Error::PersonNotFound(_)
  ));
  assert!(matches!(
    s.delete(id).await.unwrap_err(),
    Error::PersonNotFound(_)
  ));
}
