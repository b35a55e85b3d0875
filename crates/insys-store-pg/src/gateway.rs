//! [`Database`], the pooled Postgres gateway.
//!
//! Knows how to run a single statement, optionally inside its own
//! transaction. Database errors come back unchanged, wrapped in
//! [`Error::Database`]; giving them domain meaning is the caller's job.

use serde::Deserialize;
use sqlx::{
  PgPool, Postgres,
  postgres::{PgArguments, PgConnectOptions, PgPoolOptions, PgQueryResult, PgRow},
  query::{Query, QueryAs, QueryScalar},
};

use crate::{
  Error, Result,
  schema::{SCHEMA, is_duplicate_definition},
};

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_port() -> u16 { 5432 }

fn default_max_connections() -> u32 { 5 }

/// Connection settings for the Postgres pool.
///
/// Field names match the `POSTGRES_*` environment variables the server reads
/// them from (`POSTGRES_HOST`, `POSTGRES_DB`, ...).
#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  pub username:        String,
  pub password:        String,
  pub db:              String,
  #[serde(default = "default_max_connections")]
  pub max_connections: u32,
}

impl DatabaseConfig {
  pub fn connect_options(&self) -> PgConnectOptions {
    PgConnectOptions::new()
      .host(&self.host)
      .port(self.port)
      .username(&self.username)
      .password(&self.password)
      .database(&self.db)
  }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Owner of the connection pool.
///
/// Cloning is cheap; the inner pool is reference-counted.
#[derive(Clone)]
pub struct Database {
  pool: PgPool,
}

impl Database {
  /// Open a pool against the configured server. Does not touch the schema.
  pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.max_connections)
      .connect_with(config.connect_options())
      .await?;
    tracing::debug!(
      host = %config.host,
      port = config.port,
      db = %config.db,
      "connected to postgres"
    );
    Ok(Self { pool })
  }

  /// Wrap an existing pool, e.g. one provisioned by `#[sqlx::test]`.
  pub fn from_pool(pool: PgPool) -> Self { Self { pool } }

  /// Round-trip a trivial query to prove the server is reachable.
  pub async fn ping(&self) -> Result<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  /// Ensure the `insys` schema, the `sex_trait` enum and the `person` table
  /// exist. Safe to call against an already-initialised database, including
  /// when another process is initialising it concurrently.
  pub async fn init_schema(&self) -> Result<()> {
    match sqlx::raw_sql(SCHEMA).execute(&self.pool).await {
      Ok(_) => Ok(()),
      // Lost a race with a concurrent initialiser. The batch stopped at the
      // failing statement, so run it again now that the object exists.
      Err(e) if is_duplicate_definition(&e) => {
        tracing::debug!("schema definition raced: {e}");
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
      }
      Err(e) => Err(Error::Database(e)),
    }
  }

  /// Read-only path: run `query` on any pooled connection and decode every
  /// row.
  pub async fn fetch_all<'q, O>(
    &self,
    query: QueryAs<'q, Postgres, O, PgArguments>,
  ) -> Result<Vec<O>>
  where
    O: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
  {
    Ok(query.fetch_all(&self.pool).await?)
  }

  /// Run a single statement inside `BEGIN`/`COMMIT` and report what it did.
  ///
  /// On failure the transaction is rolled back and the statement's error is
  /// returned. The connection goes back to the pool either way.
  pub async fn execute_in_transaction<'q>(
    &self,
    query: Query<'q, Postgres, PgArguments>,
  ) -> Result<PgQueryResult> {
    let mut tx = self.pool.begin().await?;
    match query.execute(&mut *tx).await {
      Ok(result) => {
        tx.commit().await?;
        Ok(result)
      }
      Err(e) => {
        if let Err(rollback) = tx.rollback().await {
          tracing::warn!("rollback failed: {rollback}");
        }
        Err(Error::Database(e))
      }
    }
  }

  /// Like [`Database::execute_in_transaction`], for statements that return a
  /// single value (`INSERT ... RETURNING id`).
  pub async fn fetch_scalar_in_transaction<'q, O>(
    &self,
    query: QueryScalar<'q, Postgres, O, PgArguments>,
  ) -> Result<O>
  where
    O: Send + Unpin,
    (O,): Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
  {
    let mut tx = self.pool.begin().await?;
    match query.fetch_one(&mut *tx).await {
      Ok(value) => {
        tx.commit().await?;
        Ok(value)
      }
      Err(e) => {
        if let Err(rollback) = tx.rollback().await {
          tracing::warn!("rollback failed: {rollback}");
        }
        Err(Error::Database(e))
      }
    }
  }

  /// Drain and close the pool. Further calls on any clone will fail.
  pub async fn close(&self) {
    self.pool.close().await;
    tracing::debug!("postgres pool closed");
  }
}
