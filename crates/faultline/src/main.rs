//! faultline daemon
//!
//! HTTP service reporting every failure through the standard error contract

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use faultline::config::{Config, LogFormat, ServerConfig};
use faultline::{AppState, create_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// faultline daemon
#[derive(Parser, Debug)]
#[command(name = "faultline", version, about)]
struct Args {
    /// Configuration file (defaults to the usual search paths)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<String>,
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    init_tracing(&config.server);

    if config.security.users.is_empty() {
        tracing::warn!("no users configured, every protected route will answer 401");
    }

    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(%bind, "faultline daemon listening");
    axum::serve(listener, app).await?;

    Ok(())
}
