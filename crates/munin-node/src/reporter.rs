//! Embedding API: owns the graph registry, the processor and the server task.

use std::net::SocketAddr;
use std::sync::Arc;

use munin_core::error::{MuninError, Result};
use munin_core::metrics::MetricRegistry;
use munin_core::Units;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::NodeConfig;
use crate::hostname::{Hostname, StaticHostname, SystemHostname};
use crate::obs::NodeMetrics;
use crate::processor::CommandProcessor;
use crate::provider::{ConventionGraphProvider, GraphProvider, StaticGraphProvider};
use crate::registry::GraphRegistry;
use crate::transport;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:4951";

struct Running {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// A munin node serving one metric registry.
///
/// ```no_run
/// # async fn run() -> munin_core::Result<()> {
/// use munin_core::MetricRegistry;
/// use munin_node::{Graph, Reporter, StaticGraphProvider};
/// use std::sync::Arc;
///
/// let metrics = MetricRegistry::new();
/// let graphs = StaticGraphProvider::new([Graph::builder("requests", "app", "Requests")
///     .data_source("app.requests")
///     .build()?]);
/// let reporter = Reporter::builder(metrics).provider(Arc::new(graphs)).build()?;
/// let addr = reporter.start().await?;
/// # let _ = addr;
/// reporter.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct Reporter {
    listen: SocketAddr,
    graphs: Arc<GraphRegistry>,
    processor: Arc<CommandProcessor>,
    obs: Option<Arc<NodeMetrics>>,
    running: Mutex<Option<Running>>,
}

impl Reporter {
    pub fn builder(metrics: MetricRegistry) -> ReporterBuilder {
        ReporterBuilder {
            metrics,
            listen: None,
            hostname: None,
            units: Units::default(),
            providers: Vec::new(),
            instrument: false,
        }
    }

    /// Reporter wired from a validated config file.
    pub fn from_config(cfg: &NodeConfig, metrics: MetricRegistry) -> Result<Reporter> {
        let mut builder = Reporter::builder(metrics.clone())
            .listen(cfg.node.listen_addr()?)
            .units(cfg.node.units())
            .instrument(cfg.node.instrument);
        if let Some(h) = &cfg.node.hostname {
            builder = builder.hostname(Arc::new(StaticHostname::new(h)));
        }

        let graphs = cfg.build_graphs()?;
        if !graphs.is_empty() {
            builder = builder.provider(Arc::new(StaticGraphProvider::new(graphs)));
        }
        if cfg.discover.enabled {
            let mut discover = ConventionGraphProvider::new(metrics);
            if let Some(prefix) = &cfg.discover.prefix {
                discover = discover.with_prefix(prefix);
            }
            if let Some(property) = cfg.discover.property {
                discover = discover.with_property(property);
            }
            builder = builder.provider(Arc::new(discover));
        }
        builder.build()
    }

    /// Bind and start serving. Returns the bound address.
    ///
    /// Calling `start` on a running reporter returns the current address.
    pub async fn start(&self) -> Result<SocketAddr> {
        if let Some(addr) = self.local_addr() {
            return Ok(addr);
        }

        let listener = TcpListener::bind(self.listen).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(transport::serve(
            listener,
            Arc::clone(&self.processor),
            self.obs.clone(),
            rx,
        ));

        let mut running = self.running.lock();
        if let Some(existing) = running.as_ref() {
            // Lost a race with a concurrent start.
            let _ = shutdown.send(true);
            return Ok(existing.local_addr);
        }
        *running = Some(Running {
            local_addr,
            shutdown,
            task,
        });
        tracing::info!(listen = %local_addr, "munin node started");
        Ok(local_addr)
    }

    /// Stop accepting, close open connections and wait for the server task.
    pub async fn stop(&self) {
        let running = self.running.lock().take();
        let Some(running) = running else {
            return;
        };
        let _ = running.shutdown.send(true);
        if let Err(e) = running.task.await {
            tracing::warn!(error = %e, "server task failed");
        }
        tracing::info!(listen = %running.local_addr, "munin node stopped");
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().as_ref().map(|r| r.local_addr)
    }

    pub fn add_graphs(&self, provider: Arc<dyn GraphProvider>) {
        self.graphs.add_provider(provider);
    }

    pub fn remove_graphs(&self, provider: &Arc<dyn GraphProvider>) {
        self.graphs.remove_provider(provider);
    }

    pub fn processor(&self) -> Arc<CommandProcessor> {
        Arc::clone(&self.processor)
    }

    pub fn graphs(&self) -> Arc<GraphRegistry> {
        Arc::clone(&self.graphs)
    }

    pub fn node_metrics(&self) -> Option<Arc<NodeMetrics>> {
        self.obs.clone()
    }
}

pub struct ReporterBuilder {
    metrics: MetricRegistry,
    listen: Option<SocketAddr>,
    hostname: Option<Arc<dyn Hostname>>,
    units: Units,
    providers: Vec<Arc<dyn GraphProvider>>,
    instrument: bool,
}

impl ReporterBuilder {
    pub fn listen(mut self, addr: SocketAddr) -> Self {
        self.listen = Some(addr);
        self
    }

    pub fn hostname(mut self, hostname: Arc<dyn Hostname>) -> Self {
        self.hostname = Some(hostname);
        self
    }

    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn GraphProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Record connection/command/fetch metrics and expose the `munin_node` graph.
    pub fn instrument(mut self, enabled: bool) -> Self {
        self.instrument = enabled;
        self
    }

    pub fn build(self) -> Result<Reporter> {
        let listen = match self.listen {
            Some(addr) => addr,
            None => DEFAULT_LISTEN
                .parse()
                .map_err(|e| MuninError::Internal(format!("default listen address: {e}")))?,
        };
        let hostname = self
            .hostname
            .unwrap_or_else(|| Arc::new(SystemHostname::resolve()));

        let graphs = Arc::new(GraphRegistry::with_providers(self.providers));
        let obs = if self.instrument {
            let node = NodeMetrics::register(&self.metrics)?;
            graphs.add_provider(Arc::new(node.graphs()?));
            Some(Arc::new(node))
        } else {
            None
        };

        let processor = Arc::new(
            CommandProcessor::new(self.metrics, Arc::clone(&graphs), hostname).with_units(self.units),
        );

        Ok(Reporter {
            listen,
            graphs,
            processor,
            obs,
            running: Mutex::new(None),
        })
    }
}
