//! PetConnect server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite store, and serves the JSON marketplace API over HTTP.
//!
//! Configuration can also come from `PETCONNECT_*` environment variables,
//! e.g. `PETCONNECT_PORT=9000` or `PETCONNECT_STRIPE_SECRET_KEY=sk_...`.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use petconnect_api::AppState;
use petconnect_payments::{StripeClient, StripeConfig};
use petconnect_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "PetConnect marketplace server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration. Defaults make a bare `cargo run` work.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store_path", "petconnect.db")?
    .set_default("stripe_secret_key", "")?
    .set_default("stripe_base_url", petconnect_payments::DEFAULT_BASE_URL)?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PETCONNECT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Payment client.
  let stripe = StripeClient::new(StripeConfig {
    secret_key: server_cfg.stripe_secret_key.clone(),
    base_url:   server_cfg.stripe_base_url.clone(),
  })
  .context("failed to build payment client")?;

  // Build application state.
  let state = AppState {
    store:    Arc::new(store.clone()),
    payments: Arc::new(stripe),
  };

  let app =
    petconnect_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("Shutting down, closing store");
  store.close().await.context("failed to close store")?;

  Ok(())
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    tokio::signal::ctrl_c()
      .await
      .expect("failed to install ctrl-c handler");
  };

  #[cfg(unix)]
  let terminate = async {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
      .expect("failed to install SIGTERM handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
