//! # Named to Positional Argument Rewriting
//!
//! PostgreSQL only binds positional parameters (`$1`, `$2`, ...), while the
//! filter layer renders named placeholders (`:runtimeId`). This module
//! rewrites a rendered query into positional form.
//!
//! Positions are assigned in argument order. A name that appears again later
//! in the argument list reuses the position of its first occurrence, so every
//! logical value is bound exactly once. Named arguments the text never
//! references are dropped: the executor rejects more bind values than the
//! statement declares. A placeholder with no argument is an error, whether or
//! not any named arguments were supplied.

use super::arguments::{ArgValue, QueryArg};
use super::dialect::Dialect;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use tracing::debug;

/// Errors raised while rewriting named placeholders
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error(
        "named and positional arguments cannot be mixed in one query \
         ({named} named, {positional} positional)"
    )]
    MixedArguments { named: usize, positional: usize },

    #[error("placeholder '{placeholder}' has no bound named argument")]
    MissingNamedArgument { placeholder: String },
}

/// Query text with positional placeholders and its ordered bind values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalQuery {
    pub sql: String,
    pub args: Vec<ArgValue>,
}

/// Rewrites `<named_prefix><name>` placeholders into `<positional_prefix><n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalRewriter {
    named_prefix: char,
    positional_prefix: char,
}

impl PositionalRewriter {
    pub const POSTGRES: Self = Self {
        named_prefix: ':',
        positional_prefix: '$',
    };

    /// Rewriter for dialects whose executor cannot bind named parameters
    pub fn for_dialect(dialect: Dialect) -> Option<Self> {
        if dialect.requires_positional_args() {
            Some(Self {
                named_prefix: dialect.named_prefix(),
                positional_prefix: '$',
            })
        } else {
            None
        }
    }

    pub fn rewrite(&self, sql: &str, args: &[QueryArg]) -> Result<PositionalQuery, ArgumentError> {
        let named = args.iter().filter(|arg| arg.name().is_some()).count();
        let positional = args.len() - named;

        if named > 0 && positional > 0 {
            return Err(ArgumentError::MixedArguments { named, positional });
        }

        let chars: Vec<char> = sql.chars().collect();
        let placeholders = scan_placeholders(&chars, self.named_prefix);

        if named == 0 {
            if let Some(first) = placeholders.first() {
                return Err(self.missing(&first.name));
            }
            return Ok(PositionalQuery {
                sql: sql.to_string(),
                args: args.iter().map(|arg| arg.value().clone()).collect(),
            });
        }

        let referenced: HashSet<&str> = placeholders.iter().map(|p| p.name.as_str()).collect();
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(named);
        let mut values = Vec::with_capacity(named);

        for arg in args {
            let QueryArg::Named { name, value } = arg else {
                continue;
            };
            if !referenced.contains(name.as_str()) {
                debug!(
                    placeholder = %format!("{}{name}", self.named_prefix),
                    "named argument not referenced by query text, dropping"
                );
                continue;
            }
            if let Some(existing) = positions.get(name.as_str()) {
                debug!(
                    placeholder = %format!("{}{name}", self.named_prefix),
                    position = %format!("{}{existing}", self.positional_prefix),
                    "named argument already bound, reusing position"
                );
                continue;
            }
            values.push(value.clone());
            positions.insert(name.as_str(), values.len());
            debug!(
                placeholder = %format!("{}{name}", self.named_prefix),
                position = %format!("{}{}", self.positional_prefix, values.len()),
                "bound named argument"
            );
        }

        let sql = splice(&chars, &placeholders, |name| match positions.get(name) {
            Some(position) => Ok(format!("{}{position}", self.positional_prefix)),
            None => Err(self.missing(name)),
        })?;
        Ok(PositionalQuery { sql, args: values })
    }

    fn missing(&self, name: &str) -> ArgumentError {
        ArgumentError::MissingNamedArgument {
            placeholder: format!("{}{name}", self.named_prefix),
        }
    }
}

/// Rename every `<prefix><from>` token outside quoted text to `<prefix><to>`
pub(crate) fn rename_placeholder(sql: &str, prefix: char, from: &str, to: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let placeholders = scan_placeholders(&chars, prefix);
    splice(&chars, &placeholders, |name| {
        Ok::<_, Infallible>(format!("{prefix}{}", if name == from { to } else { name }))
    })
    .unwrap_or_else(|never| match never {})
}

/// A placeholder token; `start..end` covers the prefix and the name
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    start: usize,
    end: usize,
    name: String,
}

/// Placeholder tokens in text order, skipping quoted text and `::` casts
fn scan_placeholders(chars: &[char], prefix: char) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            i += 1;
            continue;
        }

        if c == '\'' || c == '"' {
            quote = Some(c);
            i += 1;
            continue;
        }

        if c == prefix && starts_placeholder(chars, i, prefix) {
            let mut end = i + 1;
            while end < chars.len() && is_ident_char(chars[end]) {
                end += 1;
            }
            placeholders.push(Placeholder {
                start: i,
                end,
                name: chars[i + 1..end].iter().collect(),
            });
            i = end;
            continue;
        }

        i += 1;
    }

    placeholders
}

/// Copy `chars`, replacing each placeholder with what `replace` returns for its name
fn splice<E>(
    chars: &[char],
    placeholders: &[Placeholder],
    mut replace: impl FnMut(&str) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(chars.len());
    let mut copied = 0;
    for placeholder in placeholders {
        out.extend(&chars[copied..placeholder.start]);
        out.push_str(&replace(&placeholder.name)?);
        copied = placeholder.end;
    }
    out.extend(&chars[copied..]);
    Ok(out)
}

/// A prefix starts a placeholder unless it is part of a `::` cast
fn starts_placeholder(chars: &[char], i: usize, prefix: char) -> bool {
    let after_prefix = i > 0 && chars[i - 1] == prefix;
    let next_is_ident = chars
        .get(i + 1)
        .is_some_and(|next| next.is_ascii_alphabetic() || *next == '_');
    !after_prefix && next_is_ident
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
