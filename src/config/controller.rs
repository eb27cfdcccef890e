//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use std::fmt;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Controller-level configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
/// Environment variables are populated from a ConfigMap using `envFrom` in the deployment.
#[derive(Clone)]
pub struct ControllerConfig {
    /// HTTP port for `/metrics`, `/healthz` and `/readyz`
    pub metrics_port: u16,
    /// Requeue interval used when a failing resource has no usable check interval (seconds)
    pub reconciliation_error_requeue_secs: u64,
    /// Delay before restarting the watch stream after it ends (seconds)
    pub watch_restart_delay_secs: u64,
    /// Log format (json, text)
    pub log_format: LogFormat,
    /// Maximum concurrent reconciliations
    pub max_concurrent_reconciliations: u16,
    /// Restrict the watch to PodMonitors in a single namespace
    pub watch_namespace: Option<String>,
    /// Fallback SMTP password used when a PodMonitor leaves `password` empty
    pub smtp_fallback_password: Option<String>,
}

impl fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("metrics_port", &self.metrics_port)
            .field(
                "reconciliation_error_requeue_secs",
                &self.reconciliation_error_requeue_secs,
            )
            .field("watch_restart_delay_secs", &self.watch_restart_delay_secs)
            .field("log_format", &self.log_format)
            .field(
                "max_concurrent_reconciliations",
                &self.max_concurrent_reconciliations,
            )
            .field("watch_namespace", &self.watch_namespace)
            .field(
                "smtp_fallback_password",
                &self.smtp_fallback_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            metrics_port: DEFAULT_METRICS_PORT,
            reconciliation_error_requeue_secs: DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            watch_restart_delay_secs: DEFAULT_WATCH_RESTART_DELAY_SECS,
            log_format: LogFormat::Text,
            max_concurrent_reconciliations: DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
            watch_namespace: None,
            smtp_fallback_password: None,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use crate::constants::*;
        Self {
            metrics_port: parse_or_default(&lookup, "METRICS_PORT", DEFAULT_METRICS_PORT),
            reconciliation_error_requeue_secs: parse_or_default(
                &lookup,
                "RECONCILIATION_ERROR_REQUEUE_SECS",
                DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS,
            ),
            watch_restart_delay_secs: parse_or_default(
                &lookup,
                "WATCH_RESTART_DELAY_SECS",
                DEFAULT_WATCH_RESTART_DELAY_SECS,
            ),
            log_format: lookup("LOG_FORMAT")
                .map_or(LogFormat::Text, |v| LogFormat::parse(&v)),
            max_concurrent_reconciliations: parse_or_default(
                &lookup,
                "MAX_CONCURRENT_RECONCILIATIONS",
                DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
            ),
            watch_namespace: non_empty(lookup("WATCH_NAMESPACE")),
            smtp_fallback_password: non_empty(lookup(SMTP_PASSWORD_ENV)),
        }
    }

    /// Get reconciliation error requeue duration
    pub fn reconciliation_error_requeue_duration(&self) -> Duration {
        Duration::from_secs(self.reconciliation_error_requeue_secs)
    }

    /// Get watch restart delay duration
    pub fn watch_restart_delay_duration(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_secs)
    }
}

/// Read a key and parse it, falling back to `default` when unset or malformed
fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
