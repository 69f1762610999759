use crate::constants::status_groups;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation state definitions
///
/// Only a subset is interpreted by this crate: the worker's processable
/// gate and the back-off filter. The remaining states belong to the wider
/// reconciliation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// Planned but not yet picked up
    New,
    /// A worker is currently processing the operation
    InProgress,
    /// Component reconciled successfully
    Done,
    /// Unrecoverable error
    Error,
    /// Failed, may be picked up again
    Failed,
    /// Rejected by the component reconciler
    ClientError,
    /// Lost its worker
    Orphan,
    /// Component is ready
    Ready,
    /// Reconciliation failed but can be retried
    ReconcileErrorRetryable,
    /// Deletion failed but can be retried
    DeleteErrorRetryable,
}

impl OperationState {
    /// Whether a worker may start processing an operation in this state
    pub fn is_processable(&self) -> bool {
        !status_groups::NON_PROCESSABLE.contains(self)
    }

    /// Whether the state takes part in back-off based retry sweeps
    pub fn is_reconcile_retry_eligible(&self) -> bool {
        status_groups::RECONCILE_RETRY_ELIGIBLE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Error => "error",
            Self::Failed => "failed",
            Self::ClientError => "client_error",
            Self::Orphan => "orphan",
            Self::Ready => "ready",
            Self::ReconcileErrorRetryable => "reconcile_error_retryable",
            Self::DeleteErrorRetryable => "delete_error_retryable",
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "error" => Ok(Self::Error),
            "failed" => Ok(Self::Failed),
            "client_error" => Ok(Self::ClientError),
            "orphan" => Ok(Self::Orphan),
            "ready" => Ok(Self::Ready),
            "reconcile_error_retryable" => Ok(Self::ReconcileErrorRetryable),
            "delete_error_retryable" => Ok(Self::DeleteErrorRetryable),
            _ => Err(format!("Invalid operation state: {s}")),
        }
    }
}

/// Kind of action an operation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Reconcile,
    Delete,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconcile => write!(f, "reconcile"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reconcile" => Ok(Self::Reconcile),
            "delete" => Ok(Self::Delete),
            _ => Err(format!("Invalid operation type: {s}")),
        }
    }
}

/// Invariant violations of a persisted operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationValidationError {
    #[error("operation for component '{component}' has an empty scheduling id")]
    EmptySchedulingId { component: String },

    #[error(
        "operation '{scheduling_id}/{component}' changed status at {status_created_at} \
         before it was created at {created_at}"
    )]
    StatusBeforeCreation {
        scheduling_id: String,
        component: String,
        created_at: DateTime<Utc>,
        status_created_at: DateTime<Utc>,
    },
}

/// One component-level unit of reconciliation work within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub scheduling_id: String,
    pub correlation_id: String,
    pub component: String,
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub state: OperationState,
    pub created_at: DateTime<Utc>,
    pub status_created_at: DateTime<Utc>,
    pub runtime_id: String,
    pub config_id: i64,
}

impl Operation {
    pub fn validate(&self) -> Result<(), OperationValidationError> {
        if self.scheduling_id.is_empty() {
            return Err(OperationValidationError::EmptySchedulingId {
                component: self.component.clone(),
            });
        }
        if self.status_created_at < self.created_at {
            return Err(OperationValidationError::StatusBeforeCreation {
                scheduling_id: self.scheduling_id.clone(),
                component: self.component.clone(),
                created_at: self.created_at,
                status_created_at: self.status_created_at,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Operation [SchedulingID={},CorrelationID={},RuntimeID={},Component={},Type={},State={}]",
            self.scheduling_id,
            self.correlation_id,
            self.runtime_id,
            self.component,
            self.op_type,
            self.state
        )
    }
}
