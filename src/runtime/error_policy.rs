//! # Error Policy
//!
//! Requeue decision for failed reconciliations. There is no backoff: a
//! failing PodMonitor is retried at its own check interval, forever.

use crate::controller::scheduler::{Reconciler, ReconcilerError};
use crate::crd::PodMonitor;
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::{error, info};

/// Handle a reconciliation error by requeueing at a fixed interval
pub fn handle_reconciliation_error(
    obj: Arc<PodMonitor>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = obj.name_any();
    let namespace = obj.namespace().unwrap_or_default();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.name = name.as_str(),
        resource.namespace = namespace.as_str(),
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {}/{}: {}", namespace, name, error);
    observability::metrics::increment_reconciliation_errors();

    let requeue = ctx.error_requeue(&obj);
    info!(
        retry_in_secs = requeue.as_secs(),
        "Retrying at fixed interval"
    );
    Action::requeue(requeue)
}
