//! Placeholder post-pass.
//!
//! The compiler core writes a generic `?` for every binding. The binder
//! rewrites those into the dialect's parameter syntax and builds the ordered
//! name→value map. `\?` is an escaped literal question mark: it is never
//! counted, and the backslash is dropped from the final SQL.

use indexmap::IndexMap;

use crate::ast::Value;
use crate::error::{CraftError, CraftResult};
use crate::transpiler::result::SqlResult;

/// Parameter syntax of the final SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamStyle {
    /// Keep `?`. Binding names are still generated as `p0`, `p1`, ...
    Positional,
    /// `{prefix}{base + index}`, e.g. `@p0` or `:p1`.
    Named { prefix: String, base: usize },
}

impl ParamStyle {
    fn name(&self, index: usize) -> String {
        match self {
            ParamStyle::Positional => format!("p{}", index),
            ParamStyle::Named { prefix, base } => format!("{}{}", prefix, base + index),
        }
    }
}

/// Fails when the unescaped `?` count differs from the bindings, e.g. a
/// `Value::Literal` carrying a bare `?`.
pub fn bind(raw_sql: String, bindings: Vec<Value>, style: &ParamStyle) -> CraftResult<SqlResult> {
    let mut sql = String::with_capacity(raw_sql.len());
    let mut index = 0;
    let mut chars = raw_sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
                sql.push('?');
            }
            '?' => {
                match style {
                    ParamStyle::Positional => sql.push('?'),
                    ParamStyle::Named { .. } => sql.push_str(&style.name(index)),
                }
                index += 1;
            }
            _ => sql.push(c),
        }
    }

    if index != bindings.len() {
        tracing::warn!(
            placeholders = index,
            bindings = bindings.len(),
            "placeholder count does not match bindings"
        );
        return Err(CraftError::structural(format!(
            "Compiled SQL has {} placeholders but {} bindings",
            index,
            bindings.len()
        )));
    }

    let named_bindings = bindings
        .iter()
        .enumerate()
        .map(|(i, value)| (style.name(i), value.clone()))
        .collect::<IndexMap<_, _>>();

    Ok(SqlResult {
        raw_sql,
        sql,
        bindings,
        named_bindings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_parameters() {
        let style = ParamStyle::Named {
            prefix: "@p".into(),
            base: 0,
        };
        let result = bind(
            "a = ? AND b = ?".into(),
            vec![Value::Int(1), Value::Int(2)],
            &style,
        )
        .unwrap();
        assert_eq!(result.sql, "a = @p0 AND b = @p1");
        assert_eq!(
            result.named_bindings.keys().collect::<Vec<_>>(),
            vec!["@p0", "@p1"]
        );
    }

    #[test]
    fn test_escaped_placeholder() {
        let style = ParamStyle::Named {
            prefix: "$".into(),
            base: 1,
        };
        let result = bind(r"data \? 'k' AND id = ?".into(), vec![Value::Int(7)], &style).unwrap();
        assert_eq!(result.sql, "data ? 'k' AND id = $1");
        assert_eq!(result.raw_sql, r"data \? 'k' AND id = ?");
        assert_eq!(result.interpolated(), "data ? 'k' AND id = 7");
    }

    #[test]
    fn test_positional() {
        let result = bind("x IN (?, ?)".into(), vec![Value::Int(1), Value::Int(2)], &ParamStyle::Positional).unwrap();
        assert_eq!(result.sql, "x IN (?, ?)");
        assert!(result.named_bindings.contains_key("p1"));
    }

    #[test]
    fn test_placeholder_mismatch_is_an_error() {
        let err = bind("a = ? OR b = ?".into(), vec![Value::Int(1)], &ParamStyle::Positional).unwrap_err();
        assert!(matches!(err, CraftError::Structural(_)));
    }
}
