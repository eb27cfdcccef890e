//! # PodMonitor Status
//!
//! Status written after every completed check. Each write replaces the
//! previous status as a whole.

use serde::{Deserialize, Serialize};

/// Status of the PodMonitor resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodMonitorStatus {
    /// Number of non-terminal Pods seen by the last check
    #[serde(default)]
    pub total_pods: i64,
    /// Number of zombie Pods found by the last check
    #[serde(default)]
    pub zombie_pods: i64,
    /// Number of zombie Pods deleted by the last check
    #[serde(default)]
    pub cleaned_pods: i64,
    /// Time of the last completed check (RFC3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check_time: Option<String>,
    /// Zombie Pods found by the last check
    #[serde(default)]
    pub zombie_pod_list: Vec<ZombiePodInfo>,
    /// Generation of the spec the last check ran against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// A zombie Pod as recorded in status
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZombiePodInfo {
    pub name: String,
    pub namespace: String,
    /// Seconds between Pod creation and the check that found it
    pub run_duration_seconds: i64,
    /// Pod creation time (RFC3339)
    pub creation_time: String,
    /// Pod phase label at detection time
    pub status: String,
}
