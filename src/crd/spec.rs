//! # PodMonitor Spec
//!
//! Main CRD specification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// PodMonitor Custom Resource Definition
///
/// A PodMonitor describes which Pods to watch, how long they may run before
/// being treated as zombies, and what to do once they are found.
///
/// # Example
///
/// ```yaml
/// apiVersion: podmonitor.pod-monitor.io/v1
/// kind: PodMonitor
/// metadata:
///   name: batch-jobs
///   namespace: ops
/// spec:
///   namespaces: ["batch", "etl"]
///   labelSelector:
///     app: nightly-export
///   maxRunDurationSeconds: 86400
///   checkIntervalSeconds: 300
///   autoCleanup: true
///   gracePeriodSeconds: 600
///   emailNotification:
///     enabled: true
///     recipients: ["oncall@example.com"]
///     smtpServer: smtp.example.com
///     from: podmonitor@example.com
///     useTLS: true
///     subject: "[{count}] zombie pods"
/// ```
#[derive(kube::CustomResource, Debug, Clone, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "PodMonitor",
    group = "podmonitor.pod-monitor.io",
    version = "v1",
    namespaced,
    status = "crate::crd::PodMonitorStatus",
    shortname = "pm",
    printcolumn = r#"{"name":"Total", "type":"integer", "jsonPath":".status.totalPods"}, {"name":"Zombies", "type":"integer", "jsonPath":".status.zombiePods"}, {"name":"Cleaned", "type":"integer", "jsonPath":".status.cleanedPods"}, {"name":"Last Check", "type":"string", "jsonPath":".status.lastCheckTime"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct PodMonitorSpec {
    /// Namespaces to monitor. Empty means every namespace in the cluster.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    /// Label selector (equality only) used to filter monitored Pods
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub label_selector: BTreeMap<String, String>,
    /// Pods running longer than this many seconds are treated as zombies
    pub max_run_duration_seconds: i64,
    /// Minimum spacing between two checks, in seconds
    /// Default: 60 (also used when set to 0)
    #[serde(default)]
    pub check_interval_seconds: i64,
    /// Delete zombie Pods once detected
    #[serde(default)]
    pub auto_cleanup: bool,
    /// Seconds a Pod is given, measured from its creation, before it may be deleted
    #[serde(default)]
    pub grace_period_seconds: i64,
    /// Email notification settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notification: Option<crate::crd::EmailNotificationConfig>,
}
