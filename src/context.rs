//! Tag arguments and the render-time context they are resolved against
//!
//! A tag argument is either a quoted literal (`"sm"`, `'alt text'`) or a
//! dotted variable path (`author.url`) looked up in the render context.

use std::collections::HashMap;

use serde_json::Value;

use crate::{Error, Result};

/// A classified tag argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Quoted string with the quotes stripped
    Literal(String),
    /// Variable path to look up at render time
    Reference(String),
}

impl Argument {
    /// Classify a raw token. Mismatched quotes are not a literal and the
    /// token is kept verbatim as a reference.
    pub fn parse(raw: &str) -> Self {
        match strip_quotes(raw) {
            Some(inner) => Argument::Literal(inner.to_string()),
            None => Argument::Reference(raw.to_string()),
        }
    }

    /// Resolve to a string value using `context` for references.
    pub fn resolve<C: Context + ?Sized>(&self, context: &C) -> Result<String> {
        match self {
            Argument::Literal(s) => Ok(s.clone()),
            Argument::Reference(path) => context.lookup(path),
        }
    }
}

/// Return the inside of `raw` if it starts and ends with the same quote char.
/// A lone quote character counts as an empty literal.
pub(crate) fn strip_quotes(raw: &str) -> Option<&str> {
    let first = raw.chars().next()?;
    let last = raw.chars().next_back()?;
    if first != last || !matches!(first, '"' | '\'') {
        return None;
    }
    if raw.len() < 2 {
        return Some("");
    }
    Some(&raw[1..raw.len() - 1])
}

/// Resolve a raw token against `context`.
pub fn resolve<C: Context + ?Sized>(raw: &str, context: &C) -> Result<String> {
    Argument::parse(raw).resolve(context)
}

/// Variable lookup provided by the host at render time.
pub trait Context {
    /// Look up a dotted path, failing with [`Error::ContextResolutionError`].
    fn lookup(&self, path: &str) -> Result<String>;
}

fn unresolved(path: &str) -> Error {
    Error::ContextResolutionError(format!("'{}' could not be resolved", path))
}

impl Context for HashMap<String, String> {
    fn lookup(&self, path: &str) -> Result<String> {
        self.get(path).cloned().ok_or_else(|| unresolved(path))
    }
}

impl Context for Value {
    fn lookup(&self, path: &str) -> Result<String> {
        if path.is_empty() {
            return Err(unresolved(path));
        }
        let mut current = self;
        for part in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(part),
                Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
            .ok_or_else(|| unresolved(path))?;
        }
        Ok(match current {
            Value::String(s) => s.clone(),
            Value::Null => "None".to_string(),
            other => other.to_string(),
        })
    }
}

/// A context with no variables; every reference fails to resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContext;

impl Context for EmptyContext {
    fn lookup(&self, path: &str) -> Result<String> {
        Err(unresolved(path))
    }
}
