//! Time-window filters.
//!
//! Both filters compare a timestamp column against "now minus an interval".
//! The back-off filter works in whole seconds while the recency filter keeps
//! sub-second precision, which changes rounding at query time.

use super::{dispatch, DialectTable, Filter, FilterError, FilterSql};
use crate::constants::{columns, status_groups};
use crate::database::dialect::{fractional_seconds, whole_seconds};
use crate::database::{ColumnHandler, Dialect, QueryArg};
use std::time::Duration;

const RETRY_PLACEHOLDERS: [&str; 3] = ["rifReady", "rifReconcileRetryable", "rifDeleteRetryable"];

/// Selects retry-eligible rows whose last status change is older than the back-off interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileIntervalFilter {
    reconcile_interval: Duration,
}

impl ReconcileIntervalFilter {
    const DIALECTS: DialectTable<Self> = &[
        (Dialect::Postgres, Self::render_postgres),
        (Dialect::Sqlite, Self::render_sqlite),
    ];

    pub fn new(reconcile_interval: Duration) -> Self {
        Self { reconcile_interval }
    }

    pub fn reconcile_interval(&self) -> Duration {
        self.reconcile_interval
    }

    fn render_postgres(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        let cutoff = Dialect::Postgres.now_minus_seconds(&whole_seconds(self.reconcile_interval));
        self.render_with_cutoff(dialect, columns, &cutoff)
    }

    fn render_sqlite(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        let cutoff = Dialect::Sqlite.now_minus_seconds(&whole_seconds(self.reconcile_interval));
        self.render_with_cutoff(dialect, columns, &cutoff)
    }

    fn render_with_cutoff(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
        cutoff: &str,
    ) -> Result<FilterSql, FilterError> {
        let status_column = columns.column_name(columns::STATUS)?;
        let status_created_column = columns.column_name(columns::STATUS_CREATED_AT)?;

        let placeholders: Vec<String> = RETRY_PLACEHOLDERS
            .iter()
            .map(|name| dialect.placeholder(name))
            .collect();
        let args = RETRY_PLACEHOLDERS
            .iter()
            .zip(status_groups::RECONCILE_RETRY_ELIGIBLE)
            .map(|(name, state)| QueryArg::named(*name, state.as_str()))
            .collect();

        Ok(FilterSql::new(
            format!(
                "{status_column} IN ({}) AND {status_created_column} <= {cutoff}",
                placeholders.join(", ")
            ),
            args,
        ))
    }
}

impl Filter for ReconcileIntervalFilter {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        dispatch(self, "reconcile interval", Self::DIALECTS, dialect, columns)
    }
}

/// Selects rows of one runtime created within the recency interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIntervalFilter {
    runtime_id: String,
    interval: Duration,
}

impl CreatedIntervalFilter {
    const DIALECTS: DialectTable<Self> = &[
        (Dialect::Postgres, Self::render_named),
        (Dialect::Sqlite, Self::render_named),
    ];

    pub fn new(runtime_id: impl Into<String>, interval: Duration) -> Self {
        Self {
            runtime_id: runtime_id.into(),
            interval,
        }
    }

    fn render_named(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        let runtime_column = columns.column_name(columns::RUNTIME_ID)?;
        let created_column = columns.column_name(columns::CREATED_AT)?;
        let cutoff = dialect.now_minus_seconds(&fractional_seconds(self.interval));

        Ok(FilterSql::new(
            format!(
                "{runtime_column} = {} AND {created_column} >= {cutoff}",
                dialect.placeholder("cifRuntimeId")
            ),
            vec![QueryArg::named("cifRuntimeId", self.runtime_id.as_str())],
        ))
    }
}

impl Filter for CreatedIntervalFilter {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        dispatch(self, "created interval", Self::DIALECTS, dialect, columns)
    }
}
