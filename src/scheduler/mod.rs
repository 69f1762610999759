//! # Scheduler
//!
//! Execution of individual operations.
//!
//! - [`invoker`] - contract of the externally supplied reconciliation action
//! - [`retry`] - fixed attempt, fixed delay, cancellable retry
//! - [`worker`] - state gating, dependency readiness and invocation of one operation
//!
//! Pool sizing and the scheduling loop that hands operations to workers
//! live outside this crate.

pub mod invoker;
pub mod retry;
pub mod worker;

pub use invoker::{InvokeParams, Invoker, InvokerError};
pub use retry::{AttemptFailure, Retried, RetryError, RetryPolicy};
pub use worker::{Worker, WorkerError, WorkerOutcome};
