//! Vendor portal server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ request id / trace / metrics
//!                     │
//!                     ▼
//!                 rate limit ──(429)──▶
//!                     │
//!                     ▼
//!             security headers + CORS
//!                     │
//!                     ▼
//!                  handler
//!        session → validate → store → audit
//!                     │
//!   Client Response   ▼
//!   ◀──────────────  JSON
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use vendor_portal::config::load_config;
use vendor_portal::observability::{logging, metrics};
use vendor_portal::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "vendor-portal")]
#[command(about = "Vendor management API server", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_tracing(config.environment, &config.observability);
    tracing::info!("vendor-portal v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.environment,
        rate_limit_enabled = config.rate_limit.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::from_config(config)?;
    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
