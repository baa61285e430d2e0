//! Kubernetes plumbing shared by every command.
//!
//! Native API access through kube-rs: cluster connections, the build-service
//! settings ConfigMap, merge-patch computation and the readiness waiter.

pub mod client;
pub mod config;
pub mod patch;
pub mod wait;
