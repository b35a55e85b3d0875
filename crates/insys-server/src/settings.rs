//! Runtime configuration.
//!
//! The listener is configured from `config.toml` (optional) overlaid with
//! `INSYS_*` environment variables. Database credentials come only from the
//! `POSTGRES_*` environment variables.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use insys_store_pg::DatabaseConfig;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Listener configuration, deserialised from `config.toml` and `INSYS_*`.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

pub fn load_server(path: &Path, env: Environment) -> Result<ServerConfig, ConfigError> {
  Config::builder()
    .set_default("host", DEFAULT_HOST)?
    .set_default("port", i64::from(DEFAULT_PORT))?
    .add_source(File::from(path).required(false))
    .add_source(env)
    .build()?
    .try_deserialize()
}

/// Read `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USERNAME`,
/// `POSTGRES_PASSWORD`, `POSTGRES_DB` and (optionally)
/// `POSTGRES_MAX_CONNECTIONS`.
pub fn load_database(env: Environment) -> Result<DatabaseConfig, ConfigError> {
  Config::builder().add_source(env).build()?.try_deserialize()
}

pub fn server_env() -> Environment { Environment::with_prefix("INSYS") }

pub fn database_env() -> Environment { Environment::with_prefix("POSTGRES") }
