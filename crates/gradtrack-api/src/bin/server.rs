//! Application tracker server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) merged with
//! `GRADTRACK_*` environment variables, opens the Google Sheets store, and
//! serves the JSON API over HTTP.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use gradtrack_api::ServerConfig;
use gradtrack_store_sheets::{HttpSheets, SheetsStore};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Graduate application tracker API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("GRADTRACK"))
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the worksheet. Missing credentials or a sheet that has not been
  // shared with the service account surface here, before we bind.
  let sheets = HttpSheets::open(
    &server_cfg.service_account_file,
    server_cfg.spreadsheet_id.clone(),
    server_cfg.worksheet.clone(),
  )
  .await
  .context("failed to open the spreadsheet")?;
  tracing::info!(
    service_account = %sheets.client_email(),
    worksheet = %server_cfg.worksheet,
    "connected to spreadsheet"
  );

  let store = Arc::new(SheetsStore::new(sheets));

  // The frontend is served from elsewhere; allow any origin.
  let app = gradtrack_api::api_router(store)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
