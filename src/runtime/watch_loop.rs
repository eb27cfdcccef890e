//! # Watch Loop
//!
//! Controller watch loop that monitors PodMonitor resources and triggers
//! reconciliation when they change or their requeue timer fires.

use crate::config::ControllerConfig;
use crate::controller::scheduler::{reconcile, Reconciler};
use crate::crd::PodMonitor;
use crate::runtime::error_policy::handle_reconciliation_error;
use crate::runtime::shutdown::{ShutdownSignal, ShutdownTrigger};
use crate::server::ServerState;
use futures::StreamExt;
use kube::api::Api;
use kube::Client;
use kube_runtime::{controller, watcher, Controller};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn, Instrument};

/// PodMonitors visible to the controller, cluster-wide or one namespace
pub fn monitor_api(client: Client, config: &ControllerConfig) -> Api<PodMonitor> {
    match config.watch_namespace.as_deref() {
        Some(namespace) => Api::namespaced(client, namespace),
        None => Api::all(client),
    }
}

/// Run the controller until a shutdown signal arrives
///
/// The watch is restarted after `watch_restart_delay_secs` whenever the
/// controller stream ends without a shutdown request.
pub async fn run_watch_loop(
    monitors: Api<PodMonitor>,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
    trigger: ShutdownTrigger,
    shutdown: ShutdownSignal,
) -> Result<(), anyhow::Error> {
    let config = reconciler.config().clone();

    let shutdown_server_state = Arc::clone(&server_state);
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("Received shutdown signal (SIGINT/SIGTERM), initiating graceful shutdown...");
        shutdown_server_state.set_ready(false);
        trigger.trigger();
        info!("Marked server as not ready, pending grace period waits are cancelled");
    });

    loop {
        if shutdown.is_triggered() {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        let watch_span = tracing::span!(
            tracing::Level::INFO,
            "controller.watch",
            operation = "watch_loop"
        );

        info!(
            namespace = config.watch_namespace.as_deref().unwrap_or("<all>"),
            concurrency = config.max_concurrent_reconciliations,
            "Starting controller watch loop..."
        );
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let forward_shutdown = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                shutdown.triggered().await;
                let _ = stop_tx.send(());
            }
        });

        Controller::new(monitors.clone(), watcher::Config::default())
            .with_config(
                controller::Config::default().concurrency(config.max_concurrent_reconciliations),
            )
            .graceful_shutdown_on(async move {
                let _ = stop_rx.await;
            })
            .run(reconcile, handle_reconciliation_error, Arc::clone(&reconciler))
            .for_each(|result| {
                match result {
                    Ok((obj, _action)) => {
                        debug!(resource.name = %obj.name, "watch.event.reconciled");
                    }
                    Err(e) => {
                        warn!(error = %e, "watch.event.error");
                    }
                }
                futures::future::ready(())
            })
            .instrument(watch_span)
            .await;
        forward_shutdown.abort();

        if shutdown.is_triggered() {
            info!("Shutdown requested, exiting watch loop");
            break;
        }

        error!(
            "Controller watch stream ended, restarting in {} seconds...",
            config.watch_restart_delay_secs
        );
        tokio::time::sleep(config.watch_restart_delay_duration()).await;
    }

    info!("Controller stopped gracefully");
    Ok(())
}

/// Resolve on SIGINT, or SIGTERM on unix
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler, listening for SIGINT only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
