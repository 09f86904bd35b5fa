use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use storview::core::config::Config;
use storview::core::telemetry::logging;
use storview::web;

/// Web directory browser confined to a sandbox root.
#[derive(Debug, Parser)]
#[command(name = "storview", version)]
struct Args {
    /// Directory to expose; requests cannot escape it.
    #[arg(long, default_value = "./storage")]
    root: PathBuf,

    /// Display name of the sandbox root in breadcrumbs.
    #[arg(long, default_value = "storage")]
    label: String,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init();

    let config = Config::new(&args.root, args.label, args.listen)?;
    info!(root = %config.root.display(), "serving sandbox root");

    let app = web::router(config.clone());
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!("listening on http://{}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
