//! # Status Store
//!
//! Persists a scan result into `PodMonitor.status`. The status is replaced
//! wholesale; concurrent writers are detected through `resourceVersion`.

use crate::constants::FIELD_MANAGER;
use crate::crd::{PodMonitor, PodMonitorStatus};
use async_trait::async_trait;
use kube::api::{Api, Patch, PatchParams};
use kube::{Client, ResourceExt};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("status of {namespace}/{name} was modified concurrently")]
    Conflict { namespace: String, name: String },
    #[error("PodMonitor {namespace}/{name} no longer exists")]
    NotFound { namespace: String, name: String },
    #[error("failed to update status: {0}")]
    Api(#[source] kube::Error),
}

/// Where reconciled status is written
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn update_status(
        &self,
        monitor: &PodMonitor,
        status: &PodMonitorStatus,
    ) -> Result<(), StoreError>;
}

/// `PolicyStore` backed by the `status` subresource
#[derive(Clone)]
pub struct KubePolicyStore {
    client: Client,
}

impl std::fmt::Debug for KubePolicyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubePolicyStore").finish_non_exhaustive()
    }
}

impl KubePolicyStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PolicyStore for KubePolicyStore {
    async fn update_status(
        &self,
        monitor: &PodMonitor,
        status: &PodMonitorStatus,
    ) -> Result<(), StoreError> {
        let name = monitor.name_any();
        let namespace = monitor.namespace().unwrap_or_default();
        let api: Api<PodMonitor> = Api::namespaced(self.client.clone(), &namespace);

        let patch = status_patch(monitor.resource_version(), status);
        match api
            .patch_status(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
            .await
        {
            Ok(_) => {
                debug!(resource.name = %name, resource.namespace = %namespace, "Status updated");
                Ok(())
            }
            Err(kube::Error::Api(api_err)) if api_err.code == 409 => {
                Err(StoreError::Conflict { namespace, name })
            }
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => {
                Err(StoreError::NotFound { namespace, name })
            }
            Err(e) => Err(StoreError::Api(e)),
        }
    }
}

/// Merge patch replacing the whole status
///
/// With a `resourceVersion` the API server rejects the write if the
/// resource changed since it was read.
pub fn status_patch(
    resource_version: Option<String>,
    status: &PodMonitorStatus,
) -> serde_json::Value {
    let mut patch = serde_json::json!({ "status": status });
    if let Some(rv) = resource_version {
        patch["metadata"] = serde_json::json!({ "resourceVersion": rv });
    }
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::ZombiePodInfo;

    #[test]
    fn test_patch_carries_resource_version() {
        let status = PodMonitorStatus {
            total_pods: 2,
            zombie_pods: 1,
            ..PodMonitorStatus::default()
        };
        let patch = status_patch(Some("42".to_string()), &status);
        assert_eq!(patch["metadata"]["resourceVersion"], "42");
        assert_eq!(patch["status"]["totalPods"], 2);
        assert_eq!(patch["status"]["zombiePods"], 1);
    }

    #[test]
    fn test_patch_replaces_zombie_list() {
        let status = PodMonitorStatus {
            zombie_pod_list: vec![ZombiePodInfo {
                name: "stuck".to_string(),
                namespace: "batch".to_string(),
                run_duration_seconds: 7200,
                creation_time: "2024-03-01T10:00:00+00:00".to_string(),
                status: "Running".to_string(),
            }],
            ..PodMonitorStatus::default()
        };
        let patch = status_patch(None, &status);
        assert!(patch.get("metadata").is_none());
        assert_eq!(patch["status"]["zombiePodList"][0]["runDurationSeconds"], 7200);
    }
}
