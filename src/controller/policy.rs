//! # Monitor Policy
//!
//! Validated, defaulted view of a `PodMonitorSpec` used for one reconciliation.

use crate::constants::DEFAULT_CHECK_INTERVAL_SECS;
use crate::crd::{EmailNotificationConfig, PodMonitorSpec};
use chrono::TimeDelta;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Which namespaces a scan covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceSelection {
    /// Every namespace in the cluster, enumerated at scan time
    All,
    /// An explicit list from the spec
    Only(Vec<String>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },
}

/// Policy applied to a single PodMonitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorPolicy {
    pub namespaces: NamespaceSelection,
    pub label_selector: BTreeMap<String, String>,
    pub max_run_duration: TimeDelta,
    pub check_interval: Duration,
    pub auto_cleanup: bool,
    pub grace_period: TimeDelta,
    pub notification: Option<EmailNotificationConfig>,
}

impl MonitorPolicy {
    /// Render the label selector in `key=value,key=value` form
    ///
    /// Returns `None` when the selector is empty, meaning unfiltered.
    pub fn label_selector_query(&self) -> Option<String> {
        label_selector_query(&self.label_selector)
    }

    /// Notification settings, only when they are present and enabled
    pub fn enabled_notification(&self) -> Option<&EmailNotificationConfig> {
        self.notification.as_ref().filter(|n| n.enabled)
    }
}

impl TryFrom<&PodMonitorSpec> for MonitorPolicy {
    type Error = PolicyError;

    fn try_from(spec: &PodMonitorSpec) -> Result<Self, Self::Error> {
        let max_run_duration =
            non_negative("maxRunDurationSeconds", spec.max_run_duration_seconds)?;
        let check_interval_secs =
            non_negative("checkIntervalSeconds", spec.check_interval_seconds)?;
        let grace_period = non_negative("gracePeriodSeconds", spec.grace_period_seconds)?;

        let check_interval = if check_interval_secs == 0 {
            Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS)
        } else {
            Duration::from_secs(check_interval_secs.unsigned_abs())
        };

        let namespaces = if spec.namespaces.is_empty() {
            NamespaceSelection::All
        } else {
            NamespaceSelection::Only(spec.namespaces.clone())
        };

        Ok(Self {
            namespaces,
            label_selector: spec.label_selector.clone(),
            max_run_duration: seconds(max_run_duration),
            check_interval,
            auto_cleanup: spec.auto_cleanup,
            grace_period: seconds(grace_period),
            notification: spec.email_notification.clone(),
        })
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<i64, PolicyError> {
    if value < 0 {
        return Err(PolicyError::Negative { field, value });
    }
    Ok(value)
}

fn seconds(value: i64) -> TimeDelta {
    TimeDelta::try_seconds(value).unwrap_or(TimeDelta::MAX)
}

/// Render an equality label selector, `None` when empty
pub fn label_selector_query(selector: &BTreeMap<String, String>) -> Option<String> {
    if selector.is_empty() {
        return None;
    }
    Some(
        selector
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(","),
    )
}
