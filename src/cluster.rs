//! # Cluster State
//!
//! Read and delete access to namespaces and Pods.
//!
//! The controller core only talks to the `ClusterState` trait; `KubeClusterState`
//! is the implementation backed by the Kubernetes API.

use crate::controller::classifier::{PodPhase, PodSnapshot};
use crate::controller::policy::label_selector_query;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{Api, DeleteParams, ListParams};
use kube::Client;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("cluster state unavailable: {0}")]
    Unavailable(String),
}

/// Access to the cluster objects a scan needs
#[async_trait]
pub trait ClusterState: Send + Sync {
    /// Names of every namespace in the cluster
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError>;

    /// Pods in `namespace` matching every label in `label_selector`
    ///
    /// An empty selector lists every Pod in the namespace.
    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: &BTreeMap<String, String>,
    ) -> Result<Vec<PodSnapshot>, ClusterError>;

    /// Delete a Pod with the given API-level grace period
    async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: u32,
    ) -> Result<(), ClusterError>;
}

/// `ClusterState` backed by the Kubernetes API
#[derive(Clone)]
pub struct KubeClusterState {
    client: Client,
}

impl std::fmt::Debug for KubeClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterState").finish_non_exhaustive()
    }
}

impl KubeClusterState {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterState for KubeClusterState {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let namespaces = api.list(&ListParams::default()).await?;
        Ok(namespaces
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn list_pods(
        &self,
        namespace: &str,
        label_selector: &BTreeMap<String, String>,
    ) -> Result<Vec<PodSnapshot>, ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let mut params = ListParams::default();
        if let Some(selector) = label_selector_query(label_selector) {
            params = params.labels(&selector);
        }
        let pods = api.list(&params).await?;
        Ok(pods.items.iter().filter_map(pod_snapshot).collect())
    }

    async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: u32,
    ) -> Result<(), ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = DeleteParams {
            grace_period_seconds: Some(grace_period_seconds),
            ..DeleteParams::default()
        };
        api.delete(name, &params).await?;
        Ok(())
    }
}

/// Convert an API Pod into a snapshot
///
/// Pods without a name, namespace or creation timestamp are skipped.
pub fn pod_snapshot(pod: &Pod) -> Option<PodSnapshot> {
    let name = pod.metadata.name.clone()?;
    let namespace = pod.metadata.namespace.clone()?;
    let Some(creation_time) = creation_time(pod) else {
        debug!(pod = %name, namespace = %namespace, "Skipping pod without creation timestamp");
        return None;
    };
    let phase = PodPhase::parse(pod.status.as_ref().and_then(|s| s.phase.as_deref()));

    Some(PodSnapshot {
        name,
        namespace,
        phase,
        creation_time,
    })
}

/// Read the creation timestamp through its RFC3339 wire form
fn creation_time(pod: &Pod) -> Option<DateTime<Utc>> {
    let ts = pod.metadata.creation_timestamp.as_ref()?;
    let value = serde_json::to_value(ts).ok()?;
    let raw = value.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
