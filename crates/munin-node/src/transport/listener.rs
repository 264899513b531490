//! Accept loop.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::obs::NodeMetrics;
use crate::processor::CommandProcessor;
use crate::transport::session::run_session;

/// Accept connections until `shutdown` flips (or its sender is dropped).
/// Each connection runs on its own task and watches the same signal.
pub async fn serve(
    listener: TcpListener,
    processor: Arc<CommandProcessor>,
    obs: Option<Arc<NodeMetrics>>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let accepted = tokio::select! {
            accepted = listener.accept() => accepted,
            _ = shutdown.changed() => break,
        };

        let (stream, peer) = match accepted {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };

        let processor = Arc::clone(&processor);
        let obs = obs.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tracing::debug!(%peer, "connection opened");
            if let Some(obs) = &obs {
                obs.connection_opened();
            }
            if let Err(e) = run_session(stream, processor, obs.clone(), shutdown).await {
                tracing::debug!(%peer, error = %e, "connection error");
            }
            if let Some(obs) = &obs {
                obs.connection_closed();
            }
            tracing::debug!(%peer, "connection closed");
        });
    }
}
