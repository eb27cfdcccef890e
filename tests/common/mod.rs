//! Common test utilities for scan and reconciliation tests
//!
//! In-memory fakes for the cluster, the status store and the notification
//! dispatcher, plus builders for Pods and PodMonitors.

#![allow(dead_code, reason = "not every test file uses every helper")]

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use pod_monitor_controller::cluster::{ClusterError, ClusterState};
use pod_monitor_controller::controller::classifier::{PodPhase, PodSnapshot};
use pod_monitor_controller::controller::status::{PolicyStore, StoreError};
use pod_monitor_controller::crd::{
    EmailNotificationConfig, PodMonitor, PodMonitorSpec, PodMonitorStatus,
};
use pod_monitor_controller::notification::{NotificationDispatcher, NotificationError};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// 2023-11-14 22:13:20 UTC
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

pub fn pod(namespace: &str, name: &str, phase: PodPhase, age_secs: i64) -> PodSnapshot {
    PodSnapshot {
        name: name.to_string(),
        namespace: namespace.to_string(),
        phase,
        creation_time: now() - TimeDelta::seconds(age_secs),
    }
}

#[derive(Debug, Clone)]
struct FakePod {
    snapshot: PodSnapshot,
    labels: BTreeMap<String, String>,
}

/// Cluster state held in memory
#[derive(Debug, Default)]
pub struct FakeCluster {
    namespaces: Vec<String>,
    pods: Vec<FakePod>,
    fail_namespace_enumeration: bool,
    failing_namespaces: BTreeSet<String>,
    failing_deletes: BTreeSet<(String, String)>,
    listed: Mutex<Vec<String>>,
    deleted: Mutex<Vec<(String, String, u32)>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespaces.push(namespace.to_string());
        self
    }

    pub fn with_pod(self, pod: PodSnapshot) -> Self {
        self.with_labeled_pod(pod, &[])
    }

    pub fn with_labeled_pod(mut self, pod: PodSnapshot, labels: &[(&str, &str)]) -> Self {
        if !self.namespaces.contains(&pod.namespace) {
            self.namespaces.push(pod.namespace.clone());
        }
        self.pods.push(FakePod {
            snapshot: pod,
            labels: labels
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
        self
    }

    pub fn failing_namespace_enumeration(mut self) -> Self {
        self.fail_namespace_enumeration = true;
        self
    }

    pub fn failing_namespace(mut self, namespace: &str) -> Self {
        if !self.namespaces.iter().any(|ns| ns == namespace) {
            self.namespaces.push(namespace.to_string());
        }
        self.failing_namespaces.insert(namespace.to_string());
        self
    }

    pub fn failing_delete(mut self, namespace: &str, name: &str) -> Self {
        self.failing_deletes
            .insert((namespace.to_string(), name.to_string()));
        self
    }

    /// Namespaces whose Pods were listed, in call order
    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().expect("lock").clone()
    }

    /// Successful deletions as `(namespace, name, grace_period_seconds)`
    pub fn deleted(&self) -> Vec<(String, String, u32)> {
        self.deleted.lock().expect("lock").clone()
    }
}

#[async_trait]
impl ClusterState for FakeCluster {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        if self.fail_namespace_enumeration {
            return Err(ClusterError::Unavailable("namespaces unavailable".to_string()));
        }
        Ok(self.namespaces.clone())
    }

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: &BTreeMap<String, String>,
    ) -> Result<Vec<PodSnapshot>, ClusterError> {
        self.listed.lock().expect("lock").push(namespace.to_string());
        if self.failing_namespaces.contains(namespace) {
            return Err(ClusterError::Unavailable(format!("cannot list {namespace}")));
        }
        Ok(self
            .pods
            .iter()
            .filter(|p| p.snapshot.namespace == namespace)
            .filter(|p| {
                label_selector
                    .iter()
                    .all(|(k, v)| p.labels.get(k) == Some(v))
            })
            .map(|p| p.snapshot.clone())
            .collect())
    }

    async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: u32,
    ) -> Result<(), ClusterError> {
        if self
            .failing_deletes
            .contains(&(namespace.to_string(), name.to_string()))
        {
            return Err(ClusterError::Unavailable(format!("cannot delete {name}")));
        }
        self.deleted.lock().expect("lock").push((
            namespace.to_string(),
            name.to_string(),
            grace_period_seconds,
        ));
        Ok(())
    }
}

/// Status store held in memory
#[derive(Debug, Default)]
pub struct FakeStore {
    conflict: bool,
    writes: Mutex<Vec<PodMonitorStatus>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conflicting() -> Self {
        Self {
            conflict: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<PodMonitorStatus> {
        self.writes.lock().expect("lock").clone()
    }
}

#[async_trait]
impl PolicyStore for FakeStore {
    async fn update_status(
        &self,
        monitor: &PodMonitor,
        status: &PodMonitorStatus,
    ) -> Result<(), StoreError> {
        if self.conflict {
            return Err(StoreError::Conflict {
                namespace: monitor.metadata.namespace.clone().unwrap_or_default(),
                name: monitor.metadata.name.clone().unwrap_or_default(),
            });
        }
        self.writes.lock().expect("lock").push(status.clone());
        Ok(())
    }
}

/// Dispatcher that records what it was asked to send
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(subject, body)` pairs, including failed attempts
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        _config: &EmailNotificationConfig,
    ) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("lock")
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            return Err(NotificationError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn spec(max_run_duration_seconds: i64) -> PodMonitorSpec {
    PodMonitorSpec {
        namespaces: Vec::new(),
        label_selector: BTreeMap::new(),
        max_run_duration_seconds,
        check_interval_seconds: 60,
        auto_cleanup: false,
        grace_period_seconds: 0,
        email_notification: None,
    }
}

pub fn email(subject: &str) -> EmailNotificationConfig {
    EmailNotificationConfig {
        enabled: true,
        recipients: vec!["oncall@example.com".to_string()],
        smtp_server: "smtp.example.com".to_string(),
        from: "podmonitor@example.com".to_string(),
        subject: subject.to_string(),
        ..EmailNotificationConfig::default()
    }
}

pub fn monitor(spec: PodMonitorSpec) -> PodMonitor {
    let mut monitor = PodMonitor::new("zombie-watch", spec);
    monitor.metadata.namespace = Some("ops".to_string());
    monitor.metadata.generation = Some(3);
    monitor.metadata.resource_version = Some("100".to_string());
    monitor
}

pub fn with_last_check(mut monitor: PodMonitor, last_check: DateTime<Utc>) -> PodMonitor {
    monitor.status = Some(PodMonitorStatus {
        last_check_time: Some(last_check.to_rfc3339()),
        ..PodMonitorStatus::default()
    });
    monitor
}
