//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use pod_monitor_controller::prelude::*;
//! ```

pub use crate::crd::*;

pub use crate::cluster::{ClusterError, ClusterState, KubeClusterState};
pub use crate::notification::{EmailDispatcher, NotificationDispatcher, NotificationError};

pub use crate::controller::classifier::{classify, PodPhase, PodSnapshot};
pub use crate::controller::policy::{MonitorPolicy, NamespaceSelection, PolicyError};
pub use crate::controller::scan::{ScanError, Scanner};
pub use crate::controller::scheduler::{reconcile, ReconcileOutcome, Reconciler, ReconcilerError};
pub use crate::controller::status::{KubePolicyStore, PolicyStore, StoreError};
pub use crate::controller::types::{ScanResult, ZombieRecord};

pub use crate::config::ControllerConfig;
pub use crate::runtime::shutdown::{ShutdownSignal, ShutdownTrigger};
