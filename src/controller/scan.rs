//! # Scan Executor
//!
//! One pass over the target namespaces: list Pods, classify them, clean up
//! zombies when the policy asks for it, and aggregate the result.
//!
//! Only the namespace enumeration can fail the scan. Listing, cleanup and
//! notification failures are logged and the pass continues.

use crate::cluster::{ClusterError, ClusterState};
use crate::controller::classifier::classify;
use crate::controller::cleanup::cleanup_zombie_pod;
use crate::controller::policy::{MonitorPolicy, NamespaceSelection};
use crate::controller::report::{render_body, render_subject, zombie_report_lines};
use crate::controller::types::{ScanResult, ZombieRecord};
use crate::notification::NotificationDispatcher;
use crate::observability::metrics;
use crate::runtime::shutdown::ShutdownSignal;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to list namespaces: {0}")]
    ListNamespaces(#[source] ClusterError),
}

/// Runs scans against a cluster
#[derive(Clone)]
pub struct Scanner {
    cluster: Arc<dyn ClusterState>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    shutdown: ShutdownSignal,
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

impl Scanner {
    pub fn new(
        cluster: Arc<dyn ClusterState>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            cluster,
            dispatcher,
            shutdown,
        }
    }

    /// Scan every target namespace as of `now`
    pub async fn scan(
        &self,
        policy: &MonitorPolicy,
        now: DateTime<Utc>,
    ) -> Result<ScanResult, ScanError> {
        info!(
            max_run_duration_secs = policy.max_run_duration.num_seconds(),
            auto_cleanup = policy.auto_cleanup,
            "Starting zombie pod scan"
        );

        let started = Instant::now();
        let namespaces = self.target_namespaces(policy).await?;

        let mut total_count = 0usize;
        let mut cleaned_count = 0usize;
        let mut zombies = Vec::new();

        for namespace in &namespaces {
            let pods = match self
                .cluster
                .list_pods(namespace, &policy.label_selector)
                .await
            {
                Ok(pods) => pods,
                Err(e) => {
                    error!(namespace = %namespace, error = %e, "Failed to list pods in namespace");
                    metrics::increment_namespace_list_failures();
                    continue;
                }
            };

            for pod in pods.iter().filter(|pod| !pod.phase.is_terminal()) {
                total_count += 1;
                if !classify(pod, policy.max_run_duration, now) {
                    continue;
                }

                zombies.push(ZombieRecord::from_pod(pod, now));

                if policy.auto_cleanup {
                    match cleanup_zombie_pod(
                        self.cluster.as_ref(),
                        pod,
                        policy.grace_period,
                        clock_at(now, started),
                        &self.shutdown,
                    )
                    .await
                    {
                        Ok(()) => {
                            info!(pod = %pod.name, namespace = %pod.namespace, "Deleted zombie pod");
                            metrics::increment_pods_cleaned();
                            cleaned_count += 1;
                        }
                        Err(e) => {
                            error!(pod = %pod.name, namespace = %pod.namespace, error = %e, "Failed to clean up zombie pod");
                            metrics::increment_cleanup_failures();
                        }
                    }
                }
            }
        }

        metrics::increment_pods_scanned(total_count);
        metrics::increment_zombies_detected(zombies.len());

        if !zombies.is_empty() {
            for line in zombie_report_lines(&zombies) {
                info!("{line}");
            }
            self.notify(policy, &zombies, now).await;
        }

        info!(
            total_pods = total_count,
            zombie_count = zombies.len(),
            cleaned_count,
            "Zombie pod scan completed"
        );

        Ok(ScanResult {
            total_count,
            zombie_count: zombies.len(),
            cleaned_count,
            zombies,
            checked_at: now,
        })
    }

    async fn target_namespaces(&self, policy: &MonitorPolicy) -> Result<Vec<String>, ScanError> {
        match &policy.namespaces {
            NamespaceSelection::Only(namespaces) => Ok(namespaces.clone()),
            NamespaceSelection::All => {
                let namespaces = self
                    .cluster
                    .list_namespaces()
                    .await
                    .map_err(ScanError::ListNamespaces)?;
                debug!(count = namespaces.len(), "Enumerated cluster namespaces");
                Ok(namespaces)
            }
        }
    }

    async fn notify(&self, policy: &MonitorPolicy, zombies: &[ZombieRecord], now: DateTime<Utc>) {
        let Some(config) = policy.enabled_notification() else {
            return;
        };

        let subject = render_subject(&config.subject, zombies.len());
        let body = render_body(zombies, now);

        match self.dispatcher.send(&subject, &body, config).await {
            Ok(()) => {
                info!(
                    recipients = config.recipients.len(),
                    zombie_count = zombies.len(),
                    "Sent zombie pod notification"
                );
                metrics::increment_notifications_sent();
            }
            Err(e) => {
                error!(error = %e, "Failed to send zombie pod notification");
                metrics::increment_notification_failures();
            }
        }
    }
}

/// Wall-clock time as of now, measured from `started` on the scan clock
///
/// Earlier grace-period waits in the same scan count toward later Pods.
fn clock_at(now: DateTime<Utc>, started: Instant) -> DateTime<Utc> {
    let elapsed = TimeDelta::from_std(started.elapsed()).unwrap_or_default();
    now.checked_add_signed(elapsed).unwrap_or(now)
}
