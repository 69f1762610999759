//! Logical to physical column name resolution.

use crate::constants::columns;
use std::collections::HashMap;

/// Raised when a logical column has no physical mapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no column mapping found for logical column '{logical}'")]
pub struct ColumnError {
    pub logical: String,
}

/// Maps logical column constants (e.g. `Status`) to stored column names
pub trait ColumnHandler: Send + Sync {
    fn column_name(&self, logical: &str) -> Result<String, ColumnError>;
}

/// HashMap-backed column handler
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: HashMap<String, String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a logical -> physical mapping
    pub fn with(mut self, logical: &str, physical: &str) -> Self {
        self.columns
            .insert(logical.to_string(), physical.to_string());
        self
    }

    /// Column layout of the scheduler operations table
    pub fn operations() -> Self {
        Self::new()
            .with(columns::SCHEDULING_ID, "scheduling_id")
            .with(columns::CORRELATION_ID, "correlation_id")
            .with(columns::COMPONENT, "component")
            .with(columns::TYPE, "type")
            .with(columns::STATE, "state")
            .with(columns::STATUS, "state")
            .with(columns::CREATED_AT, "created")
            .with(columns::STATUS_CREATED_AT, "updated")
            .with(columns::RUNTIME_ID, "runtime_id")
            .with(columns::CONFIG_ID, "config_version")
    }
}

impl ColumnHandler for ColumnMap {
    fn column_name(&self, logical: &str) -> Result<String, ColumnError> {
        self.columns
            .get(logical)
            .cloned()
            .ok_or_else(|| ColumnError {
                logical: logical.to_string(),
            })
    }
}
