//! # Initialization
//!
//! Controller initialization logic including rustls setup, tracing, metrics,
//! server startup, and Kubernetes client setup.

use crate::cluster::KubeClusterState;
use crate::config::{ControllerConfig, LogFormat};
use crate::controller::scan::Scanner;
use crate::controller::scheduler::Reconciler;
use crate::controller::status::KubePolicyStore;
use crate::crd::PodMonitor;
use crate::notification::{EmailDispatcher, LogTransport};
use crate::observability;
use crate::runtime::shutdown::{self, ShutdownSignal, ShutdownTrigger};
use crate::runtime::watch_loop::monitor_api;
use crate::server::{start_server, ServerState};
use anyhow::{Context, Result};
use kube::{api::Api, api::ListParams, Client};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "pod_monitor_controller=info";
const SERVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const SERVER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything the watch loop needs
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    /// PodMonitors to watch
    pub monitors: Api<PodMonitor>,
    /// Reconciler context
    pub reconciler: Arc<Reconciler>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
    /// Fired by the signal handler
    pub shutdown_trigger: ShutdownTrigger,
    /// Observed by reconciliations
    pub shutdown: ShutdownSignal,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.is_ready())
            .finish_non_exhaustive()
    }
}

/// Install the tracing subscriber for the configured log format
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };
    if let Err(e) = result {
        warn!("Tracing subscriber init returned error (already initialized?): {}", e);
    }
}

/// Initialize the controller runtime
///
/// This function handles:
/// - Tracing subscriber setup
/// - rustls crypto provider setup
/// - Metrics registration
/// - HTTP server startup
/// - Kubernetes client creation
/// - Reconciler setup
pub async fn initialize(config: ControllerConfig) -> Result<InitializationResult> {
    init_tracing(config.log_format);

    // Must run before any TLS connection is made
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    info!("Starting Pod Monitor Controller");
    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!(config = ?config, "Loaded controller configuration");

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState::default());

    let server_state_clone = Arc::clone(&server_state);
    let server_port = config.metrics_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });
    wait_for_server_ready(&server_state, &server_handle).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    let monitors = monitor_api(client.clone(), &config);

    match monitors.list(&ListParams::default().limit(1)).await {
        Ok(_) => info!("PodMonitor CRD is queryable"),
        Err(e) => warn!(
            error = %e,
            "PodMonitor CRD is not queryable yet, the watch will keep retrying"
        ),
    }

    let (shutdown_trigger, shutdown) = shutdown::channel();

    let dispatcher = Arc::new(EmailDispatcher::new(
        config.smtp_fallback_password.clone(),
        Arc::new(LogTransport),
    ));
    let scanner = Scanner::new(
        Arc::new(KubeClusterState::new(client.clone())),
        dispatcher,
        shutdown.clone(),
    );
    let store = Arc::new(KubePolicyStore::new(client.clone()));
    let reconciler = Arc::new(Reconciler::new(scanner, store, config));

    info!("Controller initialized, starting watch loop...");

    Ok(InitializationResult {
        client,
        monitors,
        reconciler,
        server_state,
        shutdown_trigger,
        shutdown,
    })
}

/// Wait for the HTTP server to bind its listener
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
) -> Result<()> {
    let start_time = Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_ready() {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > SERVER_STARTUP_TIMEOUT {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                SERVER_STARTUP_TIMEOUT.as_secs()
            ));
        }

        tokio::time::sleep(SERVER_POLL_INTERVAL).await;
    }
}
