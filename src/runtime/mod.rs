//! # Runtime
//!
//! Process-level wiring around the reconciler.
//!
//! - `initialization`: rustls, tracing, metrics, HTTP server and client setup
//! - `watch_loop`: `kube_runtime::Controller` over `PodMonitor` with restart
//! - `error_policy`: Requeue decision for failed reconciliations
//! - `shutdown`: Shutdown broadcast to in-flight reconciliations

pub mod error_policy;
pub mod initialization;
pub mod shutdown;
pub mod watch_loop;
