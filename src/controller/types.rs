//! # Scan Types
//!
//! Records produced by a scan and their conversion into resource status.

use crate::controller::classifier::PodSnapshot;
use crate::crd::{PodMonitorStatus, ZombiePodInfo};
use chrono::{DateTime, TimeDelta, Utc};

/// A Pod classified as zombie during one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZombieRecord {
    pub name: String,
    pub namespace: String,
    pub run_duration: TimeDelta,
    pub creation_time: DateTime<Utc>,
    pub status_label: String,
}

impl ZombieRecord {
    /// Build a record for `pod` as observed at `now`
    pub fn from_pod(pod: &PodSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            name: pod.name.clone(),
            namespace: pod.namespace.clone(),
            run_duration: pod.age(now),
            creation_time: pod.creation_time,
            status_label: pod.phase.label().to_string(),
        }
    }

    /// Whole seconds the Pod had been running when it was classified
    pub fn run_duration_seconds(&self) -> i64 {
        self.run_duration.num_seconds()
    }
}

impl From<&ZombieRecord> for ZombiePodInfo {
    fn from(record: &ZombieRecord) -> Self {
        Self {
            name: record.name.clone(),
            namespace: record.namespace.clone(),
            run_duration_seconds: record.run_duration_seconds(),
            creation_time: record.creation_time.to_rfc3339(),
            status: record.status_label.clone(),
        }
    }
}

/// Aggregate result of one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Non-terminal Pods seen in successfully listed namespaces
    pub total_count: usize,
    pub zombie_count: usize,
    /// Zombies whose deletion succeeded during this scan
    pub cleaned_count: usize,
    pub zombies: Vec<ZombieRecord>,
    pub checked_at: DateTime<Utc>,
}

impl ScanResult {
    /// Status that replaces whatever the resource previously recorded
    pub fn to_status(&self, observed_generation: Option<i64>) -> PodMonitorStatus {
        PodMonitorStatus {
            total_pods: count(self.total_count),
            zombie_pods: count(self.zombie_count),
            cleaned_pods: count(self.cleaned_count),
            last_check_time: Some(self.checked_at.to_rfc3339()),
            zombie_pod_list: self.zombies.iter().map(ZombiePodInfo::from).collect(),
            observed_generation,
        }
    }
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::classifier::PodPhase;

    #[test]
    fn test_status_replaces_all_fields() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();
        let pod = PodSnapshot {
            name: "stuck".to_string(),
            namespace: "batch".to_string(),
            phase: PodPhase::Pending,
            creation_time: now - TimeDelta::seconds(7200),
        };
        let record = ZombieRecord::from_pod(&pod, now);
        let result = ScanResult {
            total_count: 4,
            zombie_count: 1,
            cleaned_count: 0,
            zombies: vec![record],
            checked_at: now,
        };

        let status = result.to_status(Some(3));
        assert_eq!(status.total_pods, 4);
        assert_eq!(status.zombie_pods, 1);
        assert_eq!(status.cleaned_pods, 0);
        assert_eq!(status.observed_generation, Some(3));
        assert_eq!(status.last_check_time, Some(now.to_rfc3339()));
        assert_eq!(status.zombie_pod_list.len(), 1);
        let info = &status.zombie_pod_list[0];
        assert_eq!(info.run_duration_seconds, 7200);
        assert_eq!(info.status, "Pending");
        assert_eq!(info.creation_time, (now - TimeDelta::seconds(7200)).to_rfc3339());
    }
}
