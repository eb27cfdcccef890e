//! # Pod Classifier
//!
//! Decides whether a Pod is a zombie: a Pod that is not in a terminal phase
//! and has existed for longer than the allowed run duration.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Pod lifecycle phase
///
/// `Other` keeps phase values this controller does not know about so they can
/// still be classified and reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
    Other(String),
}

impl PodPhase {
    /// Parse the phase reported by the API server
    ///
    /// A Pod without a phase is reported as `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            Some("Succeeded") => Self::Succeeded,
            Some("Failed") => Self::Failed,
            Some("Unknown") | None => Self::Unknown,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Terminal Pods are finished and are never monitored
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Human-readable label stored in status and reports
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only view of a Pod taken during a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodSnapshot {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    pub creation_time: DateTime<Utc>,
}

impl PodSnapshot {
    /// Time elapsed since the Pod was created
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.creation_time
    }
}

/// Classify a Pod as zombie (`true`) or healthy (`false`)
///
/// Terminal Pods are never zombies. Every other phase, including unknown
/// ones, is a zombie once its age strictly exceeds `max_run_duration`.
pub fn classify(pod: &PodSnapshot, max_run_duration: TimeDelta, now: DateTime<Utc>) -> bool {
    match pod.phase {
        PodPhase::Succeeded | PodPhase::Failed => false,
        PodPhase::Pending | PodPhase::Running | PodPhase::Unknown | PodPhase::Other(_) => {
            pod.age(now) > max_run_duration
        }
    }
}
