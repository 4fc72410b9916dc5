//! Command-line entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sheetrest_core::config::SheetRestConfig;
use sheetrest_core::error::Result;

use crate::google::GoogleSheetsBackend;
use crate::http;

/// Serve Google Sheets as a row-oriented REST resource.
#[derive(Debug, Parser)]
#[command(name = "sheetrest", version, about)]
pub struct Cli {
    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Google API key used as the read-only fallback credential.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Log filter, e.g. `sheetrest=debug`. Falls back to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

/// Parses arguments, assembles the configuration and runs the server.
///
/// # Errors
/// Returns configuration errors for unusable settings and i/o errors from
/// the server loop.
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let mut config = SheetRestConfig::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(key) = cli.api_key {
        if !key.trim().is_empty() {
            config.google.api_key = Some(key);
        }
    }
    config.validate()?;

    if config.google.api_key.is_none() {
        tracing::warn!(
            "no GOOGLE_API_KEY configured; every request must carry an OAuth access token"
        );
    }

    let backend = GoogleSheetsBackend::new(&config.google)?;
    http::serve(config, backend).await
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter.map(EnvFilter::new).unwrap_or_else(|| {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sheetrest=info,tower_http=info"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
