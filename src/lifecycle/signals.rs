//! OS signal handling.

use tokio::sync::broadcast;

/// Resolve when `shutdown` fires (or its sender is dropped) or on Ctrl+C.
pub async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = shutdown.recv() => tracing::info!("Shutdown requested"),
        _ = ctrl_c => tracing::info!("Shutdown signal received"),
    }
}
