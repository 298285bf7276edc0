//! OS signal handling.
//!
//! Hosting and file serving run until the listener fails or the process is
//! interrupted; Ctrl+C (SIGINT) triggers a graceful shutdown.

/// Resolve when the process receives Ctrl+C.
///
/// If the handler cannot be installed the future never resolves, leaving the
/// server running until it is killed.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
