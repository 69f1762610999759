//! PostgreSQL-backed operation repository.

use super::{OperationRepository, RepositoryError};
use crate::config::DatabaseConfig;
use crate::constants::columns;
use crate::database::{
    ArgValue, ColumnHandler, ColumnMap, Dialect, PositionalQuery, PositionalRewriter,
};
use crate::filters::Filter;
use crate::models::{Operation, OperationState, OperationType};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{debug, instrument};

/// Logical columns selected for every operation row, in row index order
const SELECTED_COLUMNS: [&str; 9] = [
    columns::SCHEDULING_ID,
    columns::CORRELATION_ID,
    columns::COMPONENT,
    columns::TYPE,
    columns::STATE,
    columns::CREATED_AT,
    columns::STATUS_CREATED_AT,
    columns::RUNTIME_ID,
    columns::CONFIG_ID,
];

/// Build the positional SELECT statement for `filter` against `table`
pub fn select_operations_query(
    table: &str,
    columns: &dyn ColumnHandler,
    filter: &dyn Filter,
) -> Result<PositionalQuery, RepositoryError> {
    let selected = SELECTED_COLUMNS
        .iter()
        .map(|logical| columns.column_name(logical))
        .collect::<Result<Vec<_>, _>>()
        .map_err(crate::filters::FilterError::from)?;

    let predicate = filter.render(Dialect::Postgres, columns)?;
    let sql = format!(
        "SELECT {} FROM {table} WHERE {}",
        selected.join(", "),
        predicate.sql
    );

    Ok(PositionalRewriter::POSTGRES.rewrite(&sql, &predicate.args)?)
}

/// Operation repository over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgOperationRepository {
    pool: PgPool,
    table: String,
    columns: ColumnMap,
}

impl PgOperationRepository {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            columns: ColumnMap::operations(),
        }
    }

    /// Connect using the database section of the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        if config.dialect != Dialect::Postgres {
            return Err(RepositoryError::UnsupportedDialect(config.dialect));
        }
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool, config.operations_table.clone()))
    }

    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl OperationRepository for PgOperationRepository {
    #[instrument(skip_all, fields(table = %self.table))]
    async fn get_operations(&self, filter: &dyn Filter) -> Result<Vec<Operation>, RepositoryError> {
        let prepared = select_operations_query(&self.table, &self.columns, filter)?;
        debug!(sql = %prepared.sql, args = prepared.args.len(), "querying operations");

        let mut query = sqlx::query(&prepared.sql);
        for arg in &prepared.args {
            query = match arg {
                ArgValue::Text(value) => query.bind(value.clone()),
                ArgValue::Int(value) => query.bind(*value),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(operation_from_row).collect()
    }
}

fn operation_from_row(row: &PgRow) -> Result<Operation, RepositoryError> {
    let op_type: String = row.try_get(3)?;
    let state: String = row.try_get(4)?;

    let operation = Operation {
        scheduling_id: row.try_get(0)?,
        correlation_id: row.try_get(1)?,
        component: row.try_get(2)?,
        op_type: op_type
            .parse::<OperationType>()
            .map_err(RepositoryError::InvalidRow)?,
        state: state
            .parse::<OperationState>()
            .map_err(RepositoryError::InvalidRow)?,
        created_at: row.try_get::<DateTime<Utc>, _>(5)?,
        status_created_at: row.try_get::<DateTime<Utc>, _>(6)?,
        runtime_id: row.try_get(7)?,
        config_id: row.try_get(8)?,
    };
    operation.validate()?;
    Ok(operation)
}
