//! # Operation Worker
//!
//! Processes a single operation: gates on its state, resolves which peer
//! components of the same run are already done, looks up the component in
//! the cluster configuration and calls the [`Invoker`] under a
//! [`RetryPolicy`].
//!
//! Workers keep no state between invocations and may run concurrently, one
//! per operation. The ready set is a fresh read from the repository and can
//! go stale while retries are in flight; the invoker decides whether it is
//! safe to proceed.

use super::invoker::{InvokeParams, Invoker, InvokerError};
use super::retry::{RetryError, RetryPolicy};
use crate::config::WorkerConfig;
use crate::filters::{FilterMixer, SchedulingIdFilter, StatusFilter};
use crate::logging::log_worker_operation;
use crate::models::{ClusterState, Operation, OperationState};
use crate::repository::{OperationRepository, RepositoryError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Errors that end a worker invocation
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to resolve ready components: {0}")]
    Repository(#[from] RepositoryError),

    #[error("cluster '{runtime_id}' has no component '{component}' configured")]
    ComponentNotConfigured {
        runtime_id: String,
        component: String,
    },

    #[error("invoker failed for operation '{operation}': {source}")]
    Invocation {
        operation: String,
        #[source]
        source: RetryError<InvokerError>,
    },
}

impl WorkerError {
    /// Whether the invocation was abandoned because of cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Invocation { source, .. } if source.is_cancelled())
    }
}

/// How a worker invocation ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Operation was in a non-processable state and left untouched
    Skipped { state: OperationState },
    /// Invoker succeeded on the given attempt
    Completed { attempts: u32 },
}

/// Executes operations against an invoker with bounded retry
#[derive(Clone)]
pub struct Worker {
    repository: Arc<dyn OperationRepository>,
    invoker: Arc<dyn Invoker>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Worker {
    pub fn new(
        repository: Arc<dyn OperationRepository>,
        invoker: Arc<dyn Invoker>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            repository,
            invoker,
            retry,
        }
    }

    pub fn from_config(
        repository: Arc<dyn OperationRepository>,
        invoker: Arc<dyn Invoker>,
        config: &WorkerConfig,
    ) -> Self {
        Self::new(repository, invoker, config.retry_policy())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Process one operation of a reconciliation run
    #[instrument(skip_all, fields(
        scheduling_id = %op.scheduling_id,
        correlation_id = %op.correlation_id,
        component = %op.component
    ))]
    pub async fn run(
        &self,
        cancel: &CancellationToken,
        cluster_state: Arc<ClusterState>,
        op: &Operation,
        max_operation_retries: u32,
    ) -> Result<WorkerOutcome, WorkerError> {
        if !op.state.is_processable() {
            warn!(
                state = %op.state,
                "Worker cannot start processing of operation '{}' because it is in non-processable state",
                op
            );
            return Ok(WorkerOutcome::Skipped { state: op.state });
        }

        debug!("Worker starts processing of operation '{}'", op);

        let components_ready = self.components_ready(op).await?;

        let component = cluster_state.component(&op.component).cloned().ok_or_else(|| {
            WorkerError::ComponentNotConfigured {
                runtime_id: cluster_state.runtime_id().to_string(),
                component: op.component.clone(),
            }
        })?;

        let params = InvokeParams {
            component_to_reconcile: component,
            components_ready,
            scheduling_id: op.scheduling_id.clone(),
            correlation_id: op.correlation_id.clone(),
            cluster_state: Arc::clone(&cluster_state),
            max_operation_retries,
            op_type: op.op_type,
        };

        let result = self
            .retry
            .run(cancel, |attempt| {
                debug!(attempt, "Worker calls invoker for operation '{}'", op);
                self.invoker.invoke(cancel, &params)
            })
            .await;

        match result {
            Ok(retried) => {
                log_worker_operation(op, "completed", retried.attempts, None);
                Ok(WorkerOutcome::Completed {
                    attempts: retried.attempts,
                })
            }
            Err(source) => {
                let details = source.to_string();
                if !source.is_cancelled() {
                    warn!(
                        attempts = source.attempts().len(),
                        error = %details,
                        "Worker exhausted all invoker attempts for operation '{}'",
                        op
                    );
                }
                log_worker_operation(
                    op,
                    if source.is_cancelled() { "cancelled" } else { "exhausted" },
                    source.attempts().len() as u32,
                    Some(&details),
                );
                Err(WorkerError::Invocation {
                    operation: op.to_string(),
                    source,
                })
            }
        }
    }

    /// Distinct components of the same run whose operations are done
    async fn components_ready(&self, op: &Operation) -> Result<BTreeSet<String>, RepositoryError> {
        let filter = FilterMixer::new()
            .with(SchedulingIdFilter::new(op.scheduling_id.as_str()))
            .with(StatusFilter::with_states(&[OperationState::Done]));

        let done = self.repository.get_operations(&filter).await?;
        Ok(done.into_iter().map(|ready| ready.component).collect())
    }
}
