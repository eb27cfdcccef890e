//! # Custom Resource Definitions
//!
//! CRD types for the Pod Monitor Controller.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `PodMonitor` specification
//! - `notifications.rs` - Email notification settings
//! - `status.rs` - Status written after each check

mod notifications;
mod spec;
mod status;

pub use notifications::EmailNotificationConfig;
pub use spec::{PodMonitor, PodMonitorSpec};
pub use status::{PodMonitorStatus, ZombiePodInfo};
