use crate::config::ConfigError;
use crate::database::{ArgumentError, ColumnError, DialectError};
use crate::filters::FilterError;
use crate::repository::RepositoryError;
use crate::scheduler::WorkerError;

/// Crate-level error wrapping every module error
#[derive(Debug, thiserror::Error)]
pub enum ReconcilerError {
    #[error("Column error: {0}")]
    Column(#[from] ColumnError),

    #[error("Dialect error: {0}")]
    Dialect(#[from] DialectError),

    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Argument error: {0}")]
    Arguments(#[from] ArgumentError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ReconcilerError>;
