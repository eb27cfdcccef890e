//! # CRD Validation Tests
//!
//! Deserialization of sample PodMonitor manifests and the generated schema,
//! to catch drift between the Rust types and the wire format.

use kube::core::CustomResourceExt;
use pod_monitor_controller::controller::policy::{MonitorPolicy, NamespaceSelection};
use pod_monitor_controller::crd::PodMonitor;
use std::time::Duration;

#[test]
fn test_full_manifest() {
    let yaml = r#"
apiVersion: podmonitor.pod-monitor.io/v1
kind: PodMonitor
metadata:
  name: batch-jobs
  namespace: ops
spec:
  namespaces: ["batch", "etl"]
  labelSelector:
    app: nightly-export
  maxRunDurationSeconds: 86400
  checkIntervalSeconds: 300
  autoCleanup: true
  gracePeriodSeconds: 600
  emailNotification:
    enabled: true
    recipients: ["oncall@example.com"]
    smtpServer: smtp.example.com
    smtpPort: 465
    from: podmonitor@example.com
    username: mailer
    password: hunter2
    useTLS: true
    subject: "[{count}] zombie pods"
"#;

    let monitor: PodMonitor = serde_yaml::from_str(yaml).expect("valid manifest");
    let spec = &monitor.spec;
    assert_eq!(spec.namespaces, vec!["batch", "etl"]);
    assert_eq!(
        spec.label_selector.get("app").map(String::as_str),
        Some("nightly-export")
    );
    assert_eq!(spec.max_run_duration_seconds, 86_400);
    assert_eq!(spec.check_interval_seconds, 300);
    assert!(spec.auto_cleanup);
    assert_eq!(spec.grace_period_seconds, 600);

    let email = spec.email_notification.as_ref().expect("email config");
    assert!(email.enabled);
    assert!(email.use_tls);
    assert_eq!(email.smtp_port, 465);
    assert_eq!(email.subject, "[{count}] zombie pods");
    assert!(!format!("{email:?}").contains("hunter2"));
}

#[test]
fn test_minimal_manifest_defaults() {
    let yaml = r"
apiVersion: podmonitor.pod-monitor.io/v1
kind: PodMonitor
metadata:
  name: everything
  namespace: ops
spec:
  maxRunDurationSeconds: 3600
";

    let monitor: PodMonitor = serde_yaml::from_str(yaml).expect("valid manifest");
    assert!(monitor.status.is_none());

    let policy = MonitorPolicy::try_from(&monitor.spec).expect("valid policy");
    assert_eq!(policy.namespaces, NamespaceSelection::All);
    assert!(policy.label_selector.is_empty());
    assert_eq!(policy.check_interval, Duration::from_secs(60));
    assert!(!policy.auto_cleanup);
    assert!(policy.enabled_notification().is_none());
}

#[test]
fn test_status_round_trips_camel_case() {
    let yaml = r#"
apiVersion: podmonitor.pod-monitor.io/v1
kind: PodMonitor
metadata:
  name: with-status
  namespace: ops
spec:
  maxRunDurationSeconds: 3600
status:
  totalPods: 4
  zombiePods: 1
  cleanedPods: 1
  lastCheckTime: "2024-03-01T10:00:00+00:00"
  zombiePodList:
    - name: stuck
      namespace: batch
      runDurationSeconds: 7200
      creationTime: "2024-03-01T08:00:00+00:00"
      status: Running
"#;

    let monitor: PodMonitor = serde_yaml::from_str(yaml).expect("valid manifest");
    let status = monitor.status.expect("status");
    assert_eq!(status.total_pods, 4);
    assert_eq!(status.zombie_pod_list.len(), 1);
    assert_eq!(status.zombie_pod_list[0].run_duration_seconds, 7200);
}

#[test]
fn test_crd_metadata() {
    let crd = PodMonitor::crd();
    assert_eq!(
        crd.metadata.name.as_deref(),
        Some("podmonitors.podmonitor.pod-monitor.io")
    );
    assert_eq!(crd.spec.group, "podmonitor.pod-monitor.io");
    assert_eq!(crd.spec.scope, "Namespaced");
    assert_eq!(crd.spec.names.kind, "PodMonitor");
    assert_eq!(
        crd.spec.names.short_names.as_deref(),
        Some(&["pm".to_string()][..])
    );

    let version = &crd.spec.versions[0];
    assert_eq!(version.name, "v1");
    assert!(version
        .subresources
        .as_ref()
        .and_then(|s| s.status.as_ref())
        .is_some());

    let yaml = serde_yaml::to_string(&crd).expect("serializable crd");
    assert!(yaml.contains("maxRunDurationSeconds"));
    assert!(yaml.contains("useTLS"));
}
