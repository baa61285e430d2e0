//! Mock Kubernetes API server for testing the kp CLI.
//!
//! Serves a real HTTP endpoint that kubeconfig-based connections can talk to,
//! preloaded with the kpack.io resource types. Resources are kept in shared
//! mutable state so tests can assert on what the CLI wrote back.

mod catalog;
mod helpers;
mod http;

pub use catalog::{CatalogEntry, ResourceCatalog};
pub use helpers::merge_json;
pub use http::{KpackMockServer, RunningKpackMockServer, SharedResources};
