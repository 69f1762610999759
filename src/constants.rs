//! # System Constants
//!
//! Logical column names and operation state groups shared by the filter
//! layer and the worker.

use crate::models::OperationState;

/// Logical column names resolved through a [`ColumnHandler`](crate::database::ColumnHandler)
pub mod columns {
    pub const CREATED_AT: &str = "Created";
    pub const STATUS_CREATED_AT: &str = "StatusCreatedAt";
    pub const STATUS: &str = "Status";
    pub const STATE: &str = "State";
    pub const RUNTIME_ID: &str = "RuntimeID";
    pub const CONFIG_ID: &str = "ConfigID";
    pub const SCHEDULING_ID: &str = "SchedulingID";
    pub const CORRELATION_ID: &str = "CorrelationID";
    pub const COMPONENT: &str = "Component";
    pub const TYPE: &str = "Type";
}

/// Operation state groupings
pub mod status_groups {
    use super::OperationState;

    /// States a worker must not pick up
    pub const NON_PROCESSABLE: &[OperationState] = &[
        OperationState::Done,
        OperationState::Error,
        OperationState::InProgress,
    ];

    /// States eligible for a reconcile retry sweep once the back-off elapsed
    pub const RECONCILE_RETRY_ELIGIBLE: &[OperationState] = &[
        OperationState::Ready,
        OperationState::ReconcileErrorRetryable,
        OperationState::DeleteErrorRetryable,
    ];
}
