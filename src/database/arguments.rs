use std::fmt;

/// A data value bound to a query placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A bound argument, either addressed by name or by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryArg {
    Named { name: String, value: ArgValue },
    Positional(ArgValue),
}

impl QueryArg {
    pub fn named(name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        Self::Named {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn positional(value: impl Into<ArgValue>) -> Self {
        Self::Positional(value.into())
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Positional(_) => None,
        }
    }

    pub fn value(&self) -> &ArgValue {
        match self {
            Self::Named { value, .. } | Self::Positional(value) => value,
        }
    }
}
