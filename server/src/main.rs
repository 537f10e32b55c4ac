// server/src/main.rs

use anyhow::Context;
use orders_core::{PgStore, Store};
use orders_server::config::{AppConfig, LogFormat};
use orders_server::{build_app, AppState};

use actix_web::HttpServer;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing(log_format: LogFormat) {
  // RUST_LOG overrides the default level
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match log_format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Load application configuration
  let app_config = AppConfig::from_env().context("Failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!(config = ?app_config, "Starting orders server...");

  // Initialize the store
  let connect_options = app_config.database.connect_options()?;
  let store: Arc<dyn Store> = Arc::new(
    PgStore::connect(connect_options, app_config.db_max_connections)
      .await
      .context("Failed to connect to the database")?,
  );
  tracing::info!("Successfully connected to the database.");

  let app_state = AppState::new(store.clone());

  // Configure and Start Actix Web Server
  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  // actix stops gracefully on SIGINT/SIGTERM; `run` resolves once every worker is done.
  HttpServer::new(move || build_app(app_state.clone()))
    .bind(&server_address)
    .with_context(|| format!("Failed to bind {}", server_address))?
    .run()
    .await
    .context("HTTP server failed")?;
  tracing::info!("HTTP server closed.");

  store.close().await;
  tracing::info!("Database pool closed.");
  Ok(())
}
