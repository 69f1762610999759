use super::{Filter, FilterError, FilterSql};
use crate::database::named_args::rename_placeholder;
use crate::database::{ArgValue, ColumnHandler, Dialect, QueryArg};
use std::sync::Arc;
use tracing::debug;

/// ANDs an ordered list of filters into one predicate
///
/// Children render in insertion order and rendering stops at the first
/// failing child; no partial composition is returned. A child placeholder
/// whose name is already bound to a different value by an earlier child is
/// renamed to `<name>_<child index>`; the same name with the same value stays
/// shared.
#[derive(Debug, Clone, Default)]
pub struct FilterMixer {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }
}

impl Filter for FilterMixer {
    fn render(&self, dialect: Dialect, columns: &dyn ColumnHandler) -> Result<FilterSql, FilterError> {
        if self.filters.is_empty() {
            return Ok(FilterSql::new("1=1", Vec::new()));
        }

        let mut fragments = Vec::with_capacity(self.filters.len());
        let mut args: Vec<QueryArg> = Vec::new();

        for (index, filter) in self.filters.iter().enumerate() {
            let mut rendered = filter.render(dialect, columns)?;
            check_conflicts(&rendered.args)?;
            disambiguate(&mut rendered, &args, index, dialect);
            fragments.push(rendered.sql);
            args.extend(rendered.args);
        }

        let sql = fragments.join(" AND ");
        debug!(dialect = %dialect, sql = %sql, args = args.len(), "rendered filter mixer");
        Ok(FilterSql::new(sql, args))
    }
}

/// Within one fragment the same name must mean the same value; the text
/// cannot tell two such placeholders apart
fn check_conflicts(args: &[QueryArg]) -> Result<(), FilterError> {
    for (i, arg) in args.iter().enumerate() {
        let Some(name) = arg.name() else {
            continue;
        };
        if args[..i]
            .iter()
            .any(|earlier| earlier.name() == Some(name) && earlier.value() != arg.value())
        {
            return Err(FilterError::ConflictingArgument {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Rename the child's placeholders that clash with earlier bindings
fn disambiguate(rendered: &mut FilterSql, bound: &[QueryArg], index: usize, dialect: Dialect) {
    let mut names: Vec<(String, ArgValue)> = Vec::new();
    for arg in &rendered.args {
        if let QueryArg::Named { name, value } = arg {
            if !names.iter().any(|(seen, _)| seen == name) {
                names.push((name.clone(), value.clone()));
            }
        }
    }

    for (name, value) in names {
        let clashes = bound
            .iter()
            .any(|arg| arg.name() == Some(name.as_str()) && arg.value() != &value);
        if !clashes {
            continue;
        }

        let taken = |candidate: &str| {
            bound
                .iter()
                .chain(&rendered.args)
                .any(|arg| arg.name() == Some(candidate))
        };
        let mut fresh = format!("{name}_{index}");
        let mut attempt = 1;
        while taken(&fresh) {
            fresh = format!("{name}_{index}_{attempt}");
            attempt += 1;
        }

        debug!(from = %name, to = %fresh, "renaming clashing placeholder");
        rendered.sql = rename_placeholder(&rendered.sql, dialect.named_prefix(), &name, &fresh);
        for arg in rendered.args.iter_mut() {
            if arg.name() == Some(name.as_str()) {
                *arg = QueryArg::named(fresh.clone(), value.clone());
            }
        }
    }
}
