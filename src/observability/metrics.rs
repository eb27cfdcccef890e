//! # Metrics
//!
//! Prometheus metrics for monitoring the controller.
//!
//! ## Metrics Exposed
//!
//! - `pod_monitor_reconciliations_total` - Total number of reconciliations
//! - `pod_monitor_reconciliation_errors_total` - Total number of reconciliation errors
//! - `pod_monitor_reconciliation_duration_seconds` - Duration of reconciliations
//! - `pod_monitor_scans_skipped_total` - Reconciliations that stopped at the check interval gate
//! - `pod_monitor_pods_scanned_total` - Non-terminal Pods examined
//! - `pod_monitor_zombies_detected_total` - Pods classified as zombie
//! - `pod_monitor_pods_cleaned_total` - Zombie Pods deleted
//! - `pod_monitor_cleanup_failures_total` - Zombie Pod deletions that failed or were cancelled
//! - `pod_monitor_namespace_list_failures_total` - Namespaces whose Pod listing failed
//! - `pod_monitor_notifications_sent_total` - Notifications handed to the transport
//! - `pod_monitor_notification_failures_total` - Notifications that failed

use anyhow::Result;
use prometheus::{Histogram, IntCounter, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_reconciliations_total",
        "Total number of reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_reconciliation_errors_total",
        "Total number of reconciliation errors",
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "pod_monitor_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 120.0, 600.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static SCANS_SKIPPED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_scans_skipped_total",
        "Total number of reconciliations skipped because the check interval had not elapsed",
    )
    .expect("Failed to create SCANS_SKIPPED_TOTAL metric - this should never happen")
});

static PODS_SCANNED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_pods_scanned_total",
        "Total number of non-terminal pods examined",
    )
    .expect("Failed to create PODS_SCANNED_TOTAL metric - this should never happen")
});

static ZOMBIES_DETECTED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_zombies_detected_total",
        "Total number of pods classified as zombie",
    )
    .expect("Failed to create ZOMBIES_DETECTED_TOTAL metric - this should never happen")
});

static PODS_CLEANED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_pods_cleaned_total",
        "Total number of zombie pods deleted",
    )
    .expect("Failed to create PODS_CLEANED_TOTAL metric - this should never happen")
});

static CLEANUP_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_cleanup_failures_total",
        "Total number of zombie pod deletions that failed or were cancelled",
    )
    .expect("Failed to create CLEANUP_FAILURES_TOTAL metric - this should never happen")
});

static NAMESPACE_LIST_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_namespace_list_failures_total",
        "Total number of namespaces whose pod listing failed",
    )
    .expect("Failed to create NAMESPACE_LIST_FAILURES_TOTAL metric - this should never happen")
});

static NOTIFICATIONS_SENT_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_notifications_sent_total",
        "Total number of zombie notifications sent",
    )
    .expect("Failed to create NOTIFICATIONS_SENT_TOTAL metric - this should never happen")
});

static NOTIFICATION_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "pod_monitor_notification_failures_total",
        "Total number of zombie notifications that failed",
    )
    .expect("Failed to create NOTIFICATION_FAILURES_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(SCANS_SKIPPED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PODS_SCANNED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(ZOMBIES_DETECTED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(PODS_CLEANED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(CLEANUP_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(NAMESPACE_LIST_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(NOTIFICATIONS_SENT_TOTAL.clone()))?;
    REGISTRY.register(Box::new(NOTIFICATION_FAILURES_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn increment_reconciliation_errors() {
    RECONCILIATION_ERRORS_TOTAL.inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_scans_skipped() {
    SCANS_SKIPPED_TOTAL.inc();
}

pub fn increment_pods_scanned(count: usize) {
    PODS_SCANNED_TOTAL.inc_by(as_u64(count));
}

pub fn increment_zombies_detected(count: usize) {
    ZOMBIES_DETECTED_TOTAL.inc_by(as_u64(count));
}

pub fn increment_pods_cleaned() {
    PODS_CLEANED_TOTAL.inc();
}

pub fn increment_cleanup_failures() {
    CLEANUP_FAILURES_TOTAL.inc();
}

pub fn increment_namespace_list_failures() {
    NAMESPACE_LIST_FAILURES_TOTAL.inc();
}

pub fn increment_notifications_sent() {
    NOTIFICATIONS_SENT_TOTAL.inc();
}

pub fn increment_notification_failures() {
    NOTIFICATION_FAILURES_TOTAL.inc();
}

/// Current value of the namespace list failure counter
pub fn namespace_list_failures() -> u64 {
    NAMESPACE_LIST_FAILURES_TOTAL.get()
}

fn as_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}
