use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Supported query backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    Sqlite,
}

/// Errors raised when a dialect name cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialectError {
    #[error("unknown database dialect '{0}'")]
    Unknown(String),
}

impl Dialect {
    /// All dialects this crate knows how to render for
    pub const ALL: [Dialect; 2] = [Dialect::Postgres, Dialect::Sqlite];

    /// Prefix that introduces a named placeholder in query text
    pub fn named_prefix(&self) -> char {
        match self {
            Self::Postgres => ':',
            Self::Sqlite => '@',
        }
    }

    /// Render a named placeholder, e.g. `:runtimeId` or `@runtimeId`
    pub fn placeholder(&self, name: &str) -> String {
        format!("{}{name}", self.named_prefix())
    }

    /// Whether the executor for this dialect only binds positional arguments
    pub fn requires_positional_args(&self) -> bool {
        matches!(self, Self::Postgres)
    }

    /// SQL expression for "now minus `seconds`"
    ///
    /// `seconds` is inlined as text so callers decide the precision
    /// (whole seconds vs. fractional).
    pub fn now_minus_seconds(&self, seconds: &str) -> String {
        match self {
            Self::Postgres => format!("NOW() - INTERVAL '{seconds} SECOND'"),
            Self::Sqlite => format!("DATETIME('now', '-{seconds} SECONDS')"),
        }
    }
}

/// Whole seconds of an interval, truncating any fraction
pub fn whole_seconds(interval: Duration) -> String {
    interval.as_secs().to_string()
}

/// Shortest decimal representation of an interval in seconds (`1.5`, `60`)
pub fn fractional_seconds(interval: Duration) -> String {
    format!("{}", interval.as_secs_f64())
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => write!(f, "postgres"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(DialectError::Unknown(s.to_string())),
        }
    }
}
