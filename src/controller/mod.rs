//! # Controller
//!
//! Core controller modules for the Pod Monitor Controller.
//!
//! - `classifier`: Zombie classification of a single Pod
//! - `policy`: Validated view of a `PodMonitorSpec`
//! - `scan`: One pass over the target namespaces
//! - `cleanup`: Grace period wait and deletion of a zombie Pod
//! - `report`: Log and notification rendering
//! - `scheduler`: Check interval gate and the reconcile entry point
//! - `status`: Status persistence

pub mod classifier;
pub mod cleanup;
pub mod policy;
pub mod report;
pub mod scan;
pub mod scheduler;
pub mod status;
pub mod types;
