//! # Pod Monitor Controller
//!
//! Watches `PodMonitor` resources and, on each check interval, scans the
//! selected Pods for zombies: Pods that have not reached `Succeeded` or
//! `Failed` within `maxRunDurationSeconds`.
//!
//! Configuration comes from the environment (see `ControllerConfig`); the
//! flags below override the matching variables.

use anyhow::Result;
use clap::Parser;
use pod_monitor_controller::config::ControllerConfig;
use pod_monitor_controller::runtime::{initialization::initialize, watch_loop::run_watch_loop};

/// Pod Monitor Controller
#[derive(Debug, Parser)]
#[command(name = "pod-monitor-controller", version, about, long_about = None)]
struct Cli {
    /// Port for /metrics, /healthz and /readyz
    #[arg(long, env = "METRICS_PORT")]
    metrics_port: Option<u16>,

    /// Only watch PodMonitors in this namespace
    #[arg(long, env = "WATCH_NAMESPACE")]
    watch_namespace: Option<String>,

    /// Maximum number of PodMonitors reconciled concurrently
    #[arg(long, env = "MAX_CONCURRENT_RECONCILIATIONS")]
    max_concurrent_reconciliations: Option<u16>,
}

impl Cli {
    fn apply(self, mut config: ControllerConfig) -> ControllerConfig {
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        if let Some(namespace) = self.watch_namespace.filter(|ns| !ns.is_empty()) {
            config.watch_namespace = Some(namespace);
        }
        if let Some(concurrency) = self.max_concurrent_reconciliations {
            config.max_concurrent_reconciliations = concurrency;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Cli::parse().apply(ControllerConfig::from_env());

    let init = initialize(config).await?;

    run_watch_loop(
        init.monitors,
        init.reconciler,
        init.server_state,
        init.shutdown_trigger,
        init.shutdown,
    )
    .await
}
