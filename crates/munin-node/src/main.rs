//! munin-node
//!
//! Serves the node's own activity metrics plus any configured graphs over the
//! munin node protocol. Usage: `munin-node [config.yaml]`.

use tracing_subscriber::{fmt, EnvFilter};

use munin_core::MetricRegistry;
use munin_node::{config, Reporter};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "munin-node.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");

    let metrics = MetricRegistry::new();
    let reporter = Reporter::from_config(&cfg, metrics).expect("invalid graph configuration");

    tracing::info!(config = %path, "munin-node starting");
    reporter.start().await.expect("failed to bind");

    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c");
    reporter.stop().await;
}
