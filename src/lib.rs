#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLite in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Reconciler Core
//!
//! Operation selection and execution core of a cluster component
//! reconciliation engine.
//!
//! ## Overview
//!
//! A reconciliation run persists one *operation* per component. This crate
//! decides which of those operations are eligible for processing and
//! executes a single operation with dependency gating and bounded retry.
//!
//! ## Architecture
//!
//! ```text
//! filters ──▶ FilterMixer ──▶ (Postgres) PositionalRewriter ──▶ OperationRepository
//!                                                                      │
//!                                       Worker ◀── eligible operations ┘
//!                                         │  gate ─ ready set ─ component lookup
//!                                         ▼
//!                                  Invoker (RetryPolicy, CancellationToken)
//! ```
//!
//! ## Module Organization
//!
//! - [`database`] - dialects, column resolution, bound arguments, positional rewriting
//! - [`filters`] - dialect-aware predicates and their AND-composition
//! - [`repository`] - operation queries (PostgreSQL via SQLx)
//! - [`scheduler`] - invoker contract, retry policy and the worker
//! - [`models`] - operations and cluster state
//! - [`config`] - layered configuration
//! - [`logging`] - structured logging setup
//! - [`error`] - crate-level error type
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciler_core::database::{ColumnMap, Dialect, PositionalRewriter};
//! use reconciler_core::filters::{Filter, FilterMixer, ReconcileIntervalFilter, RuntimeIdFilter};
//! use std::time::Duration;
//!
//! let filter = FilterMixer::new()
//!     .with(RuntimeIdFilter::new("runtime-1"))
//!     .with(ReconcileIntervalFilter::new(Duration::from_secs(300)));
//!
//! let columns = ColumnMap::operations();
//! let rendered = filter.render(Dialect::Postgres, &columns)?;
//! let query = PositionalRewriter::POSTGRES.rewrite(&rendered.sql, &rendered.args)?;
//!
//! assert!(query.sql.starts_with("runtime_id = $1 AND state IN ($2, $3, $4)"));
//! assert_eq!(query.args.len(), 4);
//! # Ok::<(), reconciler_core::ReconcilerError>(())
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod repository;
pub mod scheduler;

pub use config::{DatabaseConfig, ReconcilerConfig, WorkerConfig};
pub use constants::{columns, status_groups};
pub use database::{ColumnHandler, ColumnMap, Dialect};
pub use error::{ReconcilerError, Result};
pub use filters::{Filter, FilterMixer, FilterSql};
pub use models::{ClusterState, Component, Operation, OperationState, OperationType};
pub use repository::{OperationRepository, PgOperationRepository};
pub use scheduler::{Invoker, RetryPolicy, Worker, WorkerOutcome};
