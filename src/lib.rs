//! # Pod Monitor Controller
//!
//! Kubernetes controller that finds "zombie" Pods, Pods that have stayed in a
//! non-terminal phase for longer than a `PodMonitor` allows. Zombies are
//! reported in the resource status, logged, optionally deleted after a grace
//! period and optionally reported by email.
//!
//! ## Module Structure
//!
//! - `crd`: `PodMonitor` custom resource types
//! - `controller`: Classification, scanning, cleanup, scheduling and status persistence
//! - `cluster`: Namespace and Pod access behind the `ClusterState` trait
//! - `notification`: Zombie report delivery
//! - `config`: Controller configuration from the environment
//! - `runtime`: Initialization, watch loop, error policy and shutdown
//! - `server`: Metrics and probe endpoints
//! - `observability`: Prometheus metrics

pub mod cluster;
pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod notification;
pub mod observability;
pub mod prelude;
pub mod runtime;
pub mod server;
