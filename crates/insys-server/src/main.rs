//! insys-server binary.
//!
//! Loads `.env` if present, reads `config.toml` (or the path given with
//! `--config`), connects to Postgres, makes sure the schema exists and serves
//! the person API over HTTP until interrupted.
//!
//! ```text
//! POSTGRES_HOST=localhost POSTGRES_USERNAME=insys POSTGRES_PASSWORD=... \
//!   POSTGRES_DB=insys cargo run -p insys-server
//! ```

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use insys_store_pg::{Database, PgPersonStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "insys person registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create the schema if needed, then exit without serving.
  #[arg(long)]
  init_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // `.env` may carry RUST_LOG, so load it before tracing.
  let dotenv = dotenvy::dotenv();

  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  match dotenv {
    Ok(path) => tracing::info!("loaded environment from {}", path.display()),
    Err(e) if e.not_found() => {}
    Err(e) => return Err(e).context("failed to read .env"),
  }

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = settings::load_server(&cli.config, settings::server_env())
    .context("failed to read server configuration")?;
  let db_cfg = settings::load_database(settings::database_env())
    .context("failed to read POSTGRES_* configuration")?;

  // Connect and prepare the schema.
  let db = Database::connect(&db_cfg)
    .await
    .with_context(|| format!("failed to connect to postgres at {}:{}", db_cfg.host, db_cfg.port))?;
  db.ping().await.context("postgres ping failed")?;
  db.init_schema().await.context("failed to initialise schema")?;
  tracing::info!(db = %db_cfg.db, "schema ready");

  if cli.init_only {
    db.close().await;
    return Ok(());
  }

  let app = insys_api::api_router(Arc::new(PgPersonStore::new(db.clone())));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  let served = axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error");

  db.close().await;
  tracing::info!("shut down");
  served
}

/// Resolve on Ctrl-C (or SIGTERM on unix).
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::warn!("failed to listen for ctrl-c: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::warn!("failed to listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {}
    () = terminate => {}
  }
  tracing::info!("shutdown signal received");
}
