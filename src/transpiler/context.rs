//! Per-compilation state: bindings in emission order and the variable
//! scope stack.

use std::sync::Arc;

use crate::ast::clauses::split_alias;
use crate::ast::{Query, Scope, Value};
use crate::config::CompilerOptions;
use crate::error::{CraftError, CraftResult};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::SqlGenerator;

pub struct Ctx<'g> {
    pub generator: &'g dyn SqlGenerator,
    pub options: &'g CompilerOptions,
    pub bindings: Vec<Value>,
    scopes: Vec<Arc<Scope>>,
    /// CTE names of the statement; never prefixed.
    ctes: Vec<String>,
    /// Variables being expanded by `parameter`.
    resolving: Vec<String>,
}

impl<'g> Ctx<'g> {
    pub fn new(generator: &'g dyn SqlGenerator, options: &'g CompilerOptions) -> Self {
        Self {
            generator,
            options,
            bindings: Vec::new(),
            scopes: Vec::new(),
            ctes: Vec::new(),
            resolving: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.generator.dialect()
    }

    /// Engine filter used for component lookups.
    pub fn engine(&self) -> Option<Dialect> {
        Some(self.dialect())
    }

    // ---- Scopes ----

    pub fn enter(&mut self, query: &Query) {
        self.scopes.push(query.scope());
    }

    pub fn leave(&mut self) {
        self.scopes.pop();
    }

    /// Innermost definition wins; snapshots of detached ancestors are
    /// searched last.
    pub fn resolve(&self, name: &str) -> CraftResult<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.own(name))
            .or_else(|| self.scopes.iter().rev().find_map(|scope| scope.lookup(name)))
            .cloned()
            .ok_or_else(|| CraftError::UndefinedVariable(name.to_string()))
    }

    /// Follow a chain of variables down to a concrete value.
    pub fn resolve_value(&self, value: &Value) -> CraftResult<Value> {
        let mut seen: Vec<String> = Vec::new();
        let mut current = value.clone();
        while let Value::Variable(name) = &current {
            if seen.contains(name) {
                return Err(variable_cycle(name));
            }
            seen.push(name.clone());
            current = self.resolve(name)?;
        }
        Ok(current)
    }

    // ---- Bindings ----

    /// Push `value` and return its placeholder text. Arrays expand to one
    /// placeholder per element (none when empty), literals are returned
    /// verbatim.
    pub fn parameter(&mut self, value: &Value) -> CraftResult<String> {
        match value {
            Value::Literal(sql) => Ok(sql.clone()),
            Value::Variable(name) => {
                if self.resolving.contains(name) {
                    return Err(variable_cycle(name));
                }
                let resolved = self.resolve(name)?;
                self.resolving.push(name.clone());
                let placeholder = self.parameter(&resolved);
                self.resolving.pop();
                placeholder
            }
            Value::Array(items) => self.parameterize(items),
            other => {
                self.bindings.push(other.clone());
                Ok("?".to_string())
            }
        }
    }

    pub fn parameterize<'v>(&mut self, values: impl IntoIterator<Item = &'v Value>) -> CraftResult<String> {
        let mut parts = Vec::new();
        for value in values {
            let part = self.parameter(value)?;
            if !part.is_empty() {
                parts.push(part);
            }
        }
        Ok(parts.join(", "))
    }

    /// Raw SQL fragment: quote `{}`/`[]` identifiers and pair each unescaped
    /// `?` with a binding.
    pub fn raw(&mut self, expression: &str, bindings: &[Value]) -> CraftResult<String> {
        let wrapped = self.generator.wrap_identifiers(expression);
        let placeholders = count_placeholders(&wrapped);
        if placeholders != bindings.len() {
            return Err(CraftError::structural(format!(
                "Raw expression '{}' has {} placeholders but {} bindings",
                expression,
                placeholders,
                bindings.len()
            )));
        }

        let mut out = String::with_capacity(wrapped.len());
        let mut values = bindings.iter();
        let mut chars = wrapped.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'?') => {
                    out.push(c);
                    if let Some(q) = chars.next() {
                        out.push(q);
                    }
                }
                '?' => match values.next() {
                    Some(value) => {
                        let placeholder = self.parameter(value)?;
                        out.push_str(&placeholder);
                    }
                    None => out.push(c),
                },
                _ => out.push(c),
            }
        }
        Ok(out)
    }

    // ---- Identifiers ----

    pub fn wrap(&self, value: &str) -> String {
        self.generator.wrap(value)
    }

    pub fn quote(&self, identifier: &str) -> String {
        self.generator.quote_identifier(identifier)
    }

    /// Quote a table reference, applying the configured table prefix.
    pub fn wrap_table(&self, table: &str) -> String {
        let (name, alias) = match split_alias(table) {
            Some((name, alias)) => (name, Some(alias)),
            None => (table.trim(), None),
        };

        let wrapped = self.generator.wrap(&self.prefixed(name));
        match alias {
            Some(alias) => format!(
                "{} {}{}",
                wrapped,
                self.generator.table_alias_keyword(),
                self.quote(alias)
            ),
            None => wrapped,
        }
    }

    pub(crate) fn register_cte(&mut self, name: &str) {
        self.ctes.push(name.to_string());
    }

    /// `name` with the table prefix applied to its last dotted part.
    pub fn prefixed(&self, name: &str) -> String {
        if self.ctes.iter().any(|cte| cte == name) {
            return name.to_string();
        }
        match &self.options.table_prefix {
            Some(prefix) => match name.rsplit_once('.') {
                Some((schema, table)) => format!("{}.{}{}", schema, prefix, table),
                None => format!("{}{}", prefix, name),
            },
            None => name.to_string(),
        }
    }
}

fn variable_cycle(name: &str) -> CraftError {
    CraftError::structural(format!("Variable '{}' refers to itself", name))
}

/// Unescaped `?` markers in `sql`.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'?') => {
                chars.next();
            }
            '?' => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_placeholders() {
        assert_eq!(count_placeholders("a = ? AND b = ?"), 2);
        assert_eq!(count_placeholders(r"data \? 'key' AND id = ?"), 1);
    }

    #[test]
    fn test_raw_expands_arrays() {
        let options = CompilerOptions::default();
        let generator = Dialect::Postgres.generator(&options);
        let mut ctx = Ctx::new(generator.as_ref(), &options);

        let sql = ctx
            .raw("{id} IN (?) AND {n} > ?", &[Value::from(vec![1, 2, 3]), Value::Int(5)])
            .unwrap();
        assert_eq!(sql, r#""id" IN (?, ?, ?) AND "n" > ?"#);
        assert_eq!(ctx.bindings.len(), 4);
    }

    #[test]
    fn test_empty_arrays_leave_no_gap() {
        let options = CompilerOptions::default();
        let generator = Dialect::Generic.generator(&options);
        let mut ctx = Ctx::new(generator.as_ref(), &options);
        let list = ctx
            .parameterize(&[Value::Array(vec![]), Value::Int(1), Value::Array(vec![])])
            .unwrap();
        assert_eq!(list, "?");
        assert_eq!(ctx.bindings, vec![Value::Int(1)]);
    }

    #[test]
    fn test_raw_binding_mismatch() {
        let options = CompilerOptions::default();
        let generator = Dialect::Generic.generator(&options);
        let mut ctx = Ctx::new(generator.as_ref(), &options);
        let err = ctx.raw("a = ?", &[]).unwrap_err();
        assert!(matches!(err, CraftError::Structural(_)));
    }

    #[test]
    fn test_table_prefix() {
        let options = CompilerOptions::builder().table_prefix("app_").build();
        let generator = Dialect::Postgres.generator(&options);
        let ctx = Ctx::new(generator.as_ref(), &options);
        assert_eq!(ctx.wrap_table("users as u"), r#""app_users" AS "u""#);
        assert_eq!(ctx.wrap_table("public.users"), r#""public"."app_users""#);

        let mut ctx = ctx;
        ctx.register_cte("recent");
        assert_eq!(ctx.wrap_table("recent as r"), r#""recent" AS "r""#);
    }
}
