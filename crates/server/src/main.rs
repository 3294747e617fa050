//! Main entry point for the postgate API server

use anyhow::Context;
use clap::Parser;
use postgate_server::build_app;
use postgate_server::logging::{log_welcome, parse_log_level, setup_logging, LoggingConfig};
use postgate_users_core::UsersConfig;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "postgate", version, about = "Blog API server with bearer-token auth")]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Address to listen on, overrides `api_bind_address`
    #[arg(short, long)]
    bind: Option<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::new(parse_log_level(&args.log_level)?);
    if args.json_logs {
        logging = logging.with_json();
    }
    setup_logging(logging)?;
    log_welcome("postgate", env!("CARGO_PKG_VERSION"));

    let mut config =
        UsersConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.api_bind_address = bind;
    }

    let app = build_app(&config).context("failed to initialise services")?;

    let listener = TcpListener::bind(&config.api_bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.api_bind_address))?;
    info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
