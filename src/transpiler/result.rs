use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::Value;

/// A compiled statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqlResult {
    /// SQL with generic `?` placeholders (escaped `\?` kept as written).
    pub raw_sql: String,
    /// SQL with the dialect's parameter syntax.
    pub sql: String,
    /// Values in placeholder order.
    pub bindings: Vec<Value>,
    /// Parameter name to value, in placeholder order.
    pub named_bindings: IndexMap<String, Value>,
}

impl SqlResult {
    /// The statement with every binding inlined as a SQL literal.
    ///
    /// For logging and debugging only. Never execute the output.
    pub fn interpolated(&self) -> String {
        let mut out = String::with_capacity(self.raw_sql.len());
        let mut values = self.bindings.iter();
        let mut chars = self.raw_sql.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'?') => {
                    chars.next();
                    out.push('?');
                }
                '?' => match values.next() {
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push('?'),
                },
                _ => out.push(c),
            }
        }
        out
    }
}

impl std::fmt::Display for SqlResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.interpolated())
    }
}
