//! OS signal handling.

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Trigger `shutdown` on the first Ctrl+C.
pub fn spawn_ctrl_c(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                shutdown.trigger();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        }
    })
}
