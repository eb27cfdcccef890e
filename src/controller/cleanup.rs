//! # Zombie Cleanup
//!
//! Deletes a zombie Pod once its grace period, measured from Pod creation,
//! has elapsed. A still-running grace period is waited out inside the
//! reconciliation that found the Pod; only that reconciliation is suspended.

use crate::cluster::{ClusterError, ClusterState};
use crate::controller::classifier::PodSnapshot;
use crate::runtime::shutdown::ShutdownSignal;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("cleanup of pod {namespace}/{name} cancelled by shutdown")]
    Cancelled { namespace: String, name: String },
    #[error("failed to delete pod {namespace}/{name}: {source}")]
    Delete {
        namespace: String,
        name: String,
        #[source]
        source: ClusterError,
    },
}

/// Part of the grace period still left at `now`
///
/// `None` when there is no grace period or it has already elapsed.
pub fn remaining_grace(
    pod: &PodSnapshot,
    grace_period: TimeDelta,
    now: DateTime<Utc>,
) -> Option<Duration> {
    if grace_period <= TimeDelta::zero() {
        return None;
    }
    let remaining = grace_period - pod.age(now);
    if remaining <= TimeDelta::zero() {
        return None;
    }
    remaining.to_std().ok()
}

/// Wait out the grace period, then delete the Pod immediately
///
/// The API-level grace period is always zero; the policy grace period has
/// already been honoured by the time the delete is issued. If `shutdown`
/// fires before the delete, the Pod is left alone.
pub async fn cleanup_zombie_pod(
    cluster: &dyn ClusterState,
    pod: &PodSnapshot,
    grace_period: TimeDelta,
    now: DateTime<Utc>,
    shutdown: &ShutdownSignal,
) -> Result<(), CleanupError> {
    let cancelled = || CleanupError::Cancelled {
        namespace: pod.namespace.clone(),
        name: pod.name.clone(),
    };

    if shutdown.is_triggered() {
        return Err(cancelled());
    }

    if let Some(wait) = remaining_grace(pod, grace_period, now) {
        info!(
            pod = %pod.name,
            namespace = %pod.namespace,
            remaining_secs = wait.as_secs(),
            "Waiting for grace period before deleting zombie pod"
        );
        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            () = shutdown.triggered() => return Err(cancelled()),
        }
    }

    cluster
        .delete_pod(&pod.namespace, &pod.name, 0)
        .await
        .map_err(|source| CleanupError::Delete {
            namespace: pod.namespace.clone(),
            name: pod.name.clone(),
            source,
        })
}
