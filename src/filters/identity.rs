use super::{dispatch, DialectTable, Filter, FilterError, FilterSql};
use crate::constants::columns;
use crate::database::{ArgValue, ColumnHandler, Dialect, QueryArg};

/// `<column> = <placeholder>` over a resolved logical column
fn equality(
    dialect: Dialect,
    columns: &dyn ColumnHandler,
    logical: &str,
    placeholder: &str,
    value: ArgValue,
) -> Result<FilterSql, FilterError> {
    let column = columns.column_name(logical)?;
    Ok(FilterSql::new(
        format!("{column} = {}", dialect.placeholder(placeholder)),
        vec![QueryArg::named(placeholder, value)],
    ))
}

/// Selects rows of one runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeIdFilter {
    runtime_id: String,
}

impl RuntimeIdFilter {
    const DIALECTS: DialectTable<Self> = &[
        (Dialect::Postgres, Self::render_named),
        (Dialect::Sqlite, Self::render_named),
    ];

    pub fn new(runtime_id: impl Into<String>) -> Self {
        Self {
            runtime_id: runtime_id.into(),
        }
    }

    fn render_named(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        equality(
            dialect,
            columns,
            columns::RUNTIME_ID,
            "ridfRuntimeId",
            ArgValue::from(self.runtime_id.as_str()),
        )
    }
}

impl Filter for RuntimeIdFilter {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        dispatch(self, "runtime id", Self::DIALECTS, dialect, columns)
    }
}

/// Selects rows of one cluster configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigIdFilter {
    config_id: i64,
}

impl ConfigIdFilter {
    const DIALECTS: DialectTable<Self> = &[
        (Dialect::Postgres, Self::render_named),
        (Dialect::Sqlite, Self::render_named),
    ];

    pub fn new(config_id: i64) -> Self {
        Self { config_id }
    }

    fn render_named(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        equality(
            dialect,
            columns,
            columns::CONFIG_ID,
            "cidfConfigId",
            ArgValue::Int(self.config_id),
        )
    }
}

impl Filter for ConfigIdFilter {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        dispatch(self, "config id", Self::DIALECTS, dialect, columns)
    }
}

/// Selects the operations of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingIdFilter {
    scheduling_id: String,
}

impl SchedulingIdFilter {
    const DIALECTS: DialectTable<Self> = &[
        (Dialect::Postgres, Self::render_named),
        (Dialect::Sqlite, Self::render_named),
    ];

    pub fn new(scheduling_id: impl Into<String>) -> Self {
        Self {
            scheduling_id: scheduling_id.into(),
        }
    }

    fn render_named(
        &self,
        dialect: Dialect,
        columns: &dyn ColumnHandler,
    ) -> Result<FilterSql, FilterError> {
        equality(
            dialect,
            columns,
            columns::SCHEDULING_ID,
            "sidfSchedulingId",
            ArgValue::from(self.scheduling_id.as_str()),
        )
    }
}

impl Filter for SchedulingIdFilter {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        dispatch(self, "scheduling id", Self::DIALECTS, dialect, columns)
    }
}
