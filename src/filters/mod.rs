//! # Operation Filters
//!
//! Composable, dialect-aware predicates that select which operations are
//! eligible for processing.
//!
//! ## Overview
//!
//! A [`Filter`] renders itself, for a given [`Dialect`] and
//! [`ColumnHandler`], into a [`FilterSql`]: a predicate fragment with named
//! placeholders plus the arguments bound to them. Column names are resolved
//! through the handler and inlined into the text; only data values are bound.
//!
//! Each concrete filter carries a static dispatch table mapping a dialect to
//! its rendering function. A dialect missing from the table renders to
//! [`FilterError::UnsupportedDialect`], never to empty or malformed SQL.
//!
//! ## Key Components
//!
//! - [`status`] - status set membership
//! - [`interval`] - reconcile back-off and creation recency windows
//! - [`identity`] - runtime, config and scheduling identity equality
//! - [`mixer`] - AND-composition of filters
//!
//! ## Example Usage
//!
//! ```rust
//! use reconciler_core::database::{ColumnMap, Dialect};
//! use reconciler_core::filters::{Filter, FilterMixer, SchedulingIdFilter, StatusFilter};
//! use reconciler_core::models::OperationState;
//!
//! let filter = FilterMixer::new()
//!     .with(SchedulingIdFilter::new("scheduling-1"))
//!     .with(StatusFilter::with_states(&[OperationState::Done]));
//!
//! let rendered = filter
//!     .render(Dialect::Postgres, &ColumnMap::operations())
//!     .unwrap();
//! assert_eq!(rendered.sql, "scheduling_id = :sidfSchedulingId AND state = :sfValue");
//! ```

pub mod identity;
pub mod interval;
pub mod mixer;
pub mod status;

pub use identity::{ConfigIdFilter, RuntimeIdFilter, SchedulingIdFilter};
pub use interval::{CreatedIntervalFilter, ReconcileIntervalFilter};
pub use mixer::FilterMixer;
pub use status::StatusFilter;

use crate::database::{ColumnError, ColumnHandler, Dialect, QueryArg};
use std::fmt;

/// Errors raised while rendering a filter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error("database dialect '{dialect}' is not supported by the {filter} filter")]
    UnsupportedDialect {
        filter: &'static str,
        dialect: Dialect,
    },

    #[error("status filter requires at least one allowed status")]
    EmptyStatusSet,

    #[error("bound argument '{name}' is declared more than once with different values in one fragment")]
    ConflictingArgument { name: String },
}

/// A rendered predicate and its bound arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSql {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

impl FilterSql {
    pub fn new(sql: impl Into<String>, args: Vec<QueryArg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// A stateless predicate descriptor
///
/// Rendering never mutates the filter, so one instance can be rendered
/// repeatedly and concurrently for different dialects.
pub trait Filter: fmt::Debug + Send + Sync {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError>;
}

/// Renders filter `F` for one dialect
pub type RenderFn<F> = fn(&F, Dialect, &dyn ColumnHandler) -> Result<FilterSql, FilterError>;

/// Dialect dispatch table of a filter kind
pub type DialectTable<F> = &'static [(Dialect, RenderFn<F>)];

/// Look up `dialect` in `table` and render with the matching function
pub(crate) fn dispatch<F>(
    filter: &F,
    name: &'static str,
    table: DialectTable<F>,
    dialect: Dialect,
    columns: &dyn ColumnHandler,
) -> Result<FilterSql, FilterError> {
    let (_, render) = table
        .iter()
        .find(|(supported, _)| *supported == dialect)
        .ok_or(FilterError::UnsupportedDialect {
            filter: name,
            dialect,
        })?;
    render(filter, dialect, columns)
}
