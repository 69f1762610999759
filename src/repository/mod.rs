//! # Operation Repository
//!
//! Read access to persisted operations through composed [`Filter`]s. The
//! dialect a filter is rendered for is implied by the repository
//! implementation.

pub mod postgres;

pub use postgres::{select_operations_query, PgOperationRepository};

use crate::database::{ArgumentError, Dialect};
use crate::filters::{Filter, FilterError};
use crate::models::{Operation, OperationValidationError};
use async_trait::async_trait;

/// Errors raised while querying operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Argument binding error: {0}")]
    Arguments(#[from] ArgumentError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid operation row: {0}")]
    InvalidRow(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(#[from] OperationValidationError),

    #[error("Repository does not support the {0} dialect")]
    UnsupportedDialect(Dialect),
}

/// Source of operations for workers and schedulers
///
/// Implementations must be safe for concurrent reads from many workers.
#[async_trait]
pub trait OperationRepository: Send + Sync {
    async fn get_operations(&self, filter: &dyn Filter) -> Result<Vec<Operation>, RepositoryError>;
}
