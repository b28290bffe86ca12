//! openarc-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `OPENARC_*`
//! environment variables, opens the JSON record store, and serves the API
//! over HTTP. With no configuration it listens on `0.0.0.0:5001` and keeps
//! `data.json` and `uploads/` in the working directory.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use openarc_api::{AppState, ServerConfig, uploads::UploadDir};
use openarc_store_json::JsonStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "OpenArc record server")]
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?
    .expand_paths();

  let uploads = UploadDir::create(server_cfg.upload_dir.clone())
    .await
    .with_context(|| {
      format!("failed to create upload directory {:?}", server_cfg.upload_dir)
    })?;

  let store = JsonStore::open(&server_cfg.data_file)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.data_file))?;

  let address = server_cfg.address();
  let state = AppState {
    store:   Arc::new(store),
    uploads: Arc::new(uploads),
    config:  Arc::new(server_cfg),
  };

  let app = openarc_api::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
