use super::{dispatch, DialectTable, Filter, FilterError, FilterSql};
use crate::constants::columns;
use crate::database::{ColumnHandler, Dialect, QueryArg};
use crate::models::OperationState;
use std::fmt::Display;

/// Selects rows whose status column holds one of the allowed values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFilter {
    column: &'static str,
    allowed: Vec<String>,
}

impl StatusFilter {
    const DIALECTS: DialectTable<Self> = &[
        (Dialect::Postgres, Self::render_named),
        (Dialect::Sqlite, Self::render_named),
    ];

    /// Filter on the `Status` column; duplicate values are dropped
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Display,
    {
        let mut allowed: Vec<String> = Vec::new();
        for status in statuses {
            let status = status.to_string();
            if !allowed.contains(&status) {
                allowed.push(status);
            }
        }
        Self {
            column: columns::STATUS,
            allowed,
        }
    }

    /// Filter operations on their `State` column
    pub fn with_states(states: &[OperationState]) -> Self {
        Self::new(states).on_column(columns::STATE)
    }

    /// Target a different logical column
    pub fn on_column(mut self, column: &'static str) -> Self {
        self.column = column;
        self
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    fn render_named(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        let column = columns.column_name(self.column)?;

        match self.allowed.as_slice() {
            [] => Err(FilterError::EmptyStatusSet),
            [single] => Ok(FilterSql::new(
                format!("{column} = {}", dialect.placeholder("sfValue")),
                vec![QueryArg::named("sfValue", single.as_str())],
            )),
            many => {
                let mut placeholders = Vec::with_capacity(many.len());
                let mut args = Vec::with_capacity(many.len());
                for (i, status) in many.iter().enumerate() {
                    let name = format!("sf{i}");
                    placeholders.push(dialect.placeholder(&name));
                    args.push(QueryArg::named(name, status.as_str()));
                }
                Ok(FilterSql::new(
                    format!("{column} IN ({})", placeholders.join(", ")),
                    args,
                ))
            }
        }
    }
}

impl Filter for StatusFilter {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        dispatch(self, "status", Self::DIALECTS, dialect, columns)
    }
}
