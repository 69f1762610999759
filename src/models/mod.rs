//! # Models
//!
//! Operations persisted per reconciliation run and the read-only cluster
//! state consumed by the worker.

pub mod cluster;
pub mod operation;

pub use cluster::{Cluster, ClusterConfiguration, ClusterState, Component};
pub use operation::{Operation, OperationState, OperationType, OperationValidationError};
