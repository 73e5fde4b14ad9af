//! ramp-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), overlays any
//! `RAMP_`-prefixed environment variables, opens an in-process SQLite store,
//! and serves the aggregation API over HTTP.
//!
//! Nested keys use `__` in the environment, e.g. `RAMP_SUMMARY__API_KEY`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use ramp_api::{ApiState, api_router};
use ramp_core::engine::AggregationEngine;
use ramp_store_sqlite::SqliteStore;
use ramp_summary::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiConfig, OpenAiGenerator, Summarizer};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Ramp accessibility aggregation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone, Debug)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  #[serde(default)]
  summary:    SummaryConfig,
}

/// Text model settings. Without an `api_key` every synopsis falls back to
/// the placeholder.
#[derive(Deserialize, Clone, Debug)]
struct SummaryConfig {
  api_key:      Option<String>,
  #[serde(default = "default_model")]
  model:        String,
  #[serde(default = "default_base_url")]
  base_url:     String,
  /// Upper bound on each model call, in seconds.
  #[serde(default = "default_timeout_secs")]
  timeout_secs: u64,
}

impl Default for SummaryConfig {
  fn default() -> Self {
    Self {
      api_key:      None,
      model:        default_model(),
      base_url:     default_base_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/ramp/ramp.db") }
fn default_model() -> String { DEFAULT_MODEL.to_owned() }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }
fn default_timeout_secs() -> u64 { 30 }

// ─── Main ─────────────────────────────────────────────────────────────────────

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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("RAMP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Text model, if configured.
  let summary_cfg = &server_cfg.summary;
  let timeout = Duration::from_secs(summary_cfg.timeout_secs);
  let generator = match &summary_cfg.api_key {
    Some(api_key) => Some(
      OpenAiGenerator::new(OpenAiConfig {
        api_key: api_key.clone(),
        model: summary_cfg.model.clone(),
        base_url: summary_cfg.base_url.clone(),
        timeout,
      })
      .context("failed to build text model client")?,
    ),
    None => {
      tracing::warn!("no summary.api_key configured; summaries will omit synopses");
      None
    }
  };

  let state = ApiState::new(
    AggregationEngine::new(store),
    Summarizer::new(generator, timeout),
  );

  let app = api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
