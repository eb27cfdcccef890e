//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Field manager name used for status writes
pub const FIELD_MANAGER: &str = "pod-monitor-controller";

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default requeue interval for reconciliation errors when the resource's own
/// check interval cannot be determined (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 60;

/// Default delay before restarting the watch stream after it ends (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_SECS: u64 = 5;

/// Default maximum number of PodMonitors reconciled at the same time
pub const DEFAULT_MAX_CONCURRENT_RECONCILIATIONS: u16 = 10;

/// Check interval used when `checkIntervalSeconds` is zero or absent
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// SMTP port used when `smtpPort` is unset and TLS is requested
pub const DEFAULT_SMTP_TLS_PORT: u16 = 587;

/// SMTP port used when `smtpPort` is unset and TLS is not requested
pub const DEFAULT_SMTP_PLAIN_PORT: u16 = 25;

/// Subject template used when `emailNotification.subject` is empty
pub const DEFAULT_SUBJECT_TEMPLATE: &str = "PodMonitor 僵尸 Pod 告警";

/// Placeholder replaced with the zombie count in subject templates
pub const SUBJECT_COUNT_PLACEHOLDER: &str = "{count}";

/// Environment variable holding the fallback SMTP password
pub const SMTP_PASSWORD_ENV: &str = "SMTP_PASSWORD";

/// Timestamp layout used in reports and notification bodies
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Seconds in one day, used when rendering run durations as days
pub const SECONDS_PER_DAY: f64 = 86_400.0;
