use crate::models::{ClusterState, Component, OperationType};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Errors reported by an invoker
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokerError {
    #[error("reconciliation of component '{component}' failed: {message}")]
    Failed { component: String, message: String },

    #[error("invocation of component '{component}' was cancelled")]
    Cancelled { component: String },
}

impl InvokerError {
    pub fn failed(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Everything an invoker needs to reconcile one component
#[derive(Debug, Clone)]
pub struct InvokeParams {
    pub component_to_reconcile: Component,
    /// Components whose operations are already done within the same run
    pub components_ready: BTreeSet<String>,
    pub scheduling_id: String,
    pub correlation_id: String,
    pub cluster_state: Arc<ClusterState>,
    pub max_operation_retries: u32,
    pub op_type: OperationType,
}

/// Runs the reconciliation action for one component
///
/// The invoker owns the state transitions of the operation it processes.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(
        &self,
        cancel: &CancellationToken,
        params: &InvokeParams,
    ) -> Result<(), InvokerError>;
}
