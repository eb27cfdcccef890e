//! # Reconciliation Scheduler
//!
//! Entry point for every PodMonitor event. Enforces the minimum spacing
//! between checks, runs the scan, persists the result and decides when the
//! resource should be looked at again.
//!
//! ```text
//! Idle --(interval elapsed)--> Scanning --> Persisting --> Idle
//!   ^                                                       |
//!   +------------------ requeue after checkInterval --------+
//! ```
//!
//! `kube_runtime::Controller` never runs two reconciliations of the same
//! object at once, so the state above needs no locking.

use crate::config::ControllerConfig;
use crate::controller::policy::{MonitorPolicy, PolicyError};
use crate::controller::scan::{ScanError, Scanner};
use crate::controller::status::{PolicyStore, StoreError};
use crate::controller::types::ScanResult;
use crate::crd::PodMonitor;
use crate::observability::metrics;
use chrono::{DateTime, Utc};
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, Instrument};

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("invalid PodMonitor spec: {0}")]
    Policy(#[from] PolicyError),
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("failed to persist scan result: {0}")]
    Persist(#[from] StoreError),
}

/// Decision of the check interval gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckGate {
    Due,
    Wait(Duration),
}

/// Decide whether a check may run at `now`
///
/// A last check in the future (clock skew) counts as zero elapsed time, so
/// `checkedAt` never moves backwards.
pub fn check_gate(
    last_check: Option<DateTime<Utc>>,
    interval: Duration,
    now: DateTime<Utc>,
) -> CheckGate {
    let Some(last_check) = last_check else {
        return CheckGate::Due;
    };
    let elapsed = (now - last_check).to_std().unwrap_or(Duration::ZERO);
    if elapsed < interval {
        CheckGate::Wait(interval - elapsed)
    } else {
        CheckGate::Due
    }
}

/// Last check time recorded in the resource status
///
/// An unparseable timestamp is treated as no previous check.
pub fn last_check_time(monitor: &PodMonitor) -> Option<DateTime<Utc>> {
    let raw = monitor.status.as_ref()?.last_check_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// What one reconciliation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The check interval had not elapsed
    Skipped { wait: Duration },
    /// A scan ran and its result was persisted
    Completed {
        result: ScanResult,
        requeue: Duration,
    },
}

impl ReconcileOutcome {
    pub fn requeue_after(&self) -> Duration {
        match self {
            Self::Skipped { wait } => *wait,
            Self::Completed { requeue, .. } => *requeue,
        }
    }
}

/// Shared reconciliation context
pub struct Reconciler {
    scanner: Scanner,
    store: Arc<dyn PolicyStore>,
    config: ControllerConfig,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("scanner", &self.scanner)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(scanner: Scanner, store: Arc<dyn PolicyStore>, config: ControllerConfig) -> Self {
        Self {
            scanner,
            store,
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run one pass of the state machine for `monitor` at `now`
    pub async fn run_check(
        &self,
        monitor: &PodMonitor,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, ReconcilerError> {
        let policy = MonitorPolicy::try_from(&monitor.spec)?;

        if let CheckGate::Wait(wait) = check_gate(last_check_time(monitor), policy.check_interval, now) {
            debug!(wait_secs = wait.as_secs(), "Check interval not reached, skipping scan");
            metrics::increment_scans_skipped();
            return Ok(ReconcileOutcome::Skipped { wait });
        }

        let result = self.scanner.scan(&policy, now).await?;

        let status = result.to_status(monitor.metadata.generation);
        self.store.update_status(monitor, &status).await?;

        Ok(ReconcileOutcome::Completed {
            result,
            requeue: policy.check_interval,
        })
    }

    /// Requeue interval after a failed reconciliation of `monitor`
    ///
    /// The resource's own check interval when its spec is valid, otherwise
    /// the controller-wide error requeue.
    pub fn error_requeue(&self, monitor: &PodMonitor) -> Duration {
        MonitorPolicy::try_from(&monitor.spec).map_or_else(
            |_| self.config.reconciliation_error_requeue_duration(),
            |policy| policy.check_interval,
        )
    }
}

/// `kube_runtime::Controller` reconcile function
#[allow(
    clippy::missing_errors_doc,
    reason = "Errors are handed to the error policy"
)]
pub async fn reconcile(
    monitor: Arc<PodMonitor>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let name = monitor.name_any();
    let namespace = monitor.namespace().unwrap_or_default();
    let span = tracing::span!(
        tracing::Level::INFO,
        "controller.reconcile",
        resource.name = name.as_str(),
        resource.namespace = namespace.as_str(),
        resource.generation = monitor.metadata.generation.unwrap_or(0),
    );

    async move {
        metrics::increment_reconciliations();
        let started = Instant::now();

        let outcome = ctx.run_check(&monitor, Utc::now()).await;
        metrics::observe_reconciliation_duration(started.elapsed().as_secs_f64());

        let outcome = outcome?;
        if let ReconcileOutcome::Completed { result, requeue } = &outcome {
            info!(
                total_pods = result.total_count,
                zombie_count = result.zombie_count,
                cleaned_count = result.cleaned_count,
                next_check_secs = requeue.as_secs(),
                "Reconciliation completed"
            );
        }
        Ok(Action::requeue(outcome.requeue_after()))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    #[test]
    fn test_first_check_is_due() {
        assert_eq!(
            check_gate(None, Duration::from_secs(60), at(1_700_000_000)),
            CheckGate::Due
        );
    }

    #[test]
    fn test_wait_is_interval_minus_elapsed() {
        let last = at(1_700_000_000);
        let now = last + TimeDelta::seconds(20);
        assert_eq!(
            check_gate(Some(last), Duration::from_secs(60), now),
            CheckGate::Wait(Duration::from_secs(40))
        );
    }

    #[test]
    fn test_due_once_interval_elapsed() {
        let last = at(1_700_000_000);
        assert_eq!(
            check_gate(Some(last), Duration::from_secs(60), last + TimeDelta::seconds(60)),
            CheckGate::Due
        );
        assert_eq!(
            check_gate(Some(last), Duration::from_secs(60), last + TimeDelta::seconds(3600)),
            CheckGate::Due
        );
    }

    #[test]
    fn test_last_check_in_future_waits_full_interval() {
        let last = at(1_700_000_000);
        let now = last - TimeDelta::seconds(30);
        assert_eq!(
            check_gate(Some(last), Duration::from_secs(60), now),
            CheckGate::Wait(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_sub_second_elapsed_is_kept() {
        let last = at(1_700_000_000);
        let now = last + TimeDelta::milliseconds(59_500);
        assert_eq!(
            check_gate(Some(last), Duration::from_secs(60), now),
            CheckGate::Wait(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_outcome_requeue_after() {
        let skipped = ReconcileOutcome::Skipped {
            wait: Duration::from_secs(12),
        };
        assert_eq!(skipped.requeue_after(), Duration::from_secs(12));
    }
}
