//! # Database Dialect Support
//!
//! Everything the filter layer needs to know about the target backend:
//!
//! - [`dialect`] - supported dialects, placeholder prefixes and interval syntax
//! - [`columns`] - logical to physical column resolution
//! - [`arguments`] - bound argument values
//! - [`named_args`] - named to positional placeholder rewriting for PostgreSQL

pub mod arguments;
pub mod columns;
pub mod dialect;
pub mod named_args;

pub use arguments::{ArgValue, QueryArg};
pub use columns::{ColumnError, ColumnHandler, ColumnMap};
pub use dialect::{Dialect, DialectError};
pub use named_args::{ArgumentError, PositionalQuery, PositionalRewriter};
