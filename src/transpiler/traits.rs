//! Transpiler traits and utilities.

use crate::ast::clauses::split_alias;
use crate::ast::{DatePart, LockMode, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::ddl::DdlFormat;
use crate::transpiler::dialect::Dialect;

/// How a dialect renders LIMIT / OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT ? OFFSET ?`. `unbounded` is the literal limit used when only an
    /// offset is set, for engines that reject a bare OFFSET.
    LimitOffset { unbounded: Option<&'static str> },
    /// `OFFSET ? ROWS FETCH NEXT ? ROWS ONLY`, prefixed with `safe_order`
    /// when the query has no ORDER BY.
    OffsetFetch { safe_order: &'static str },
    /// `SELECT TOP (?)`, or a ROW_NUMBER() wrapper when an offset is set.
    TopRowNumber,
    /// Nested ROWNUM wrappers.
    RowNum,
    /// `SELECT FIRST ?` / `SELECT SKIP ?` / `ROWS ? TO ?`
    FirstSkip,
}

/// How a multi-row INSERT is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiInsert {
    /// `VALUES (..), (..)`
    ValuesList,
    /// `INSERT ALL INTO t (..) VALUES (..) ... SELECT 1 FROM DUAL`
    InsertAll,
    /// `SELECT .. FROM <dummy> UNION ALL SELECT ..`
    UnionSelect,
}

/// How inline CTE rows are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdHocStyle {
    /// `SELECT ? AS a, ? AS b UNION ALL SELECT ...`
    UnionAll,
    /// `SELECT a, b FROM (VALUES (?, ?), ...) AS tbl (a, b)`
    Values,
}

/// Table-level hint attached to a table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableHint {
    NoLock,
    Index(String),
    Lock(LockMode),
}

/// Trait for dialect-specific SQL generation.
///
/// Every method has the generic-SQL behavior as its default; a dialect
/// overrides only what it spells differently.
pub trait SqlGenerator: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Opening and closing identifier quote.
    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    /// Quote a single identifier part. `*` is left alone.
    fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        let (open, close) = self.identifier_quotes();
        let doubled = format!("{close}{close}");
        format!("{}{}{}", open, name.replace(close, &doubled), close)
    }

    fn column_alias_keyword(&self) -> &'static str {
        "AS "
    }

    fn table_alias_keyword(&self) -> &'static str {
        "AS "
    }

    /// Named parameter prefix (`@p` gives `@p0`). `None` keeps positional `?`.
    fn parameter_prefix(&self) -> Option<&'static str> {
        Some("@p")
    }

    /// Get the boolean literal (true/false vs 1/0).
    fn bool_literal(&self, val: bool) -> String {
        if val { "true".to_string() } else { "false".to_string() }
    }

    fn random_order(&self, _seed: Option<&str>) -> String {
        "RANDOM()".to_string()
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset { unbounded: None }
    }

    /// Statement appended after a single-row insert asking for the new id.
    fn last_insert_id(&self) -> Option<&'static str> {
        None
    }

    fn multi_insert(&self) -> MultiInsert {
        MultiInsert::ValuesList
    }

    /// One-row table for SELECTs without a real source (`DUAL`).
    fn dummy_table(&self) -> Option<&'static str> {
        None
    }

    fn adhoc_style(&self) -> AdHocStyle {
        AdHocStyle::UnionAll
    }

    /// Aggregates accept `FILTER (WHERE ...)`.
    fn supports_filter_clause(&self) -> bool {
        false
    }

    /// Native case-insensitive LIKE keyword, if any.
    fn case_insensitive_like(&self) -> Option<&'static str> {
        None
    }

    fn lower(&self, expression: &str) -> String {
        format!("LOWER({})", expression)
    }

    /// Compare a date part of `column` against an already-rendered placeholder.
    fn date_condition(
        &self,
        column: &str,
        part: DatePart,
        op: &str,
        placeholder: &str,
        _value: &Value,
    ) -> String {
        format!("{}({}) {} {}", part.keyword(), column, op, placeholder)
    }

    /// Text appended after a table reference for the given hints.
    fn table_hints(&self, _hints: &[TableHint]) -> String {
        String::new()
    }

    /// Does a row lock render as a table hint rather than a trailing clause?
    fn lock_as_table_hint(&self) -> bool {
        false
    }

    /// Trailing lock clause.
    fn lock_clause(&self, mode: LockMode) -> CraftResult<String> {
        Ok(match mode {
            LockMode::Update => "FOR UPDATE".to_string(),
            LockMode::Share => "FOR SHARE".to_string(),
        })
    }

    fn ddl(&self) -> &'static dyn DdlFormat;

    /// Quote an identifier that may be dotted and carry `" as alias"`.
    fn wrap(&self, value: &str) -> String {
        if let Some((name, alias)) = split_alias(value) {
            return format!(
                "{} {}{}",
                self.wrap(name),
                self.column_alias_keyword(),
                self.quote_identifier(alias)
            );
        }
        value
            .split('.')
            .map(|part| self.quote_identifier(part.trim()))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Replace `{name}` / `[name]` markers in raw SQL with the dialect's
    /// quotes. A backslash before a marker keeps it literal.
    fn wrap_identifiers(&self, input: &str) -> String {
        let (open, close) = self.identifier_quotes();
        let mut out = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if matches!(chars.peek(), Some('{' | '}' | '[' | ']')) => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '{' | '[' => out.push(open),
                '}' | ']' => out.push(close),
                _ => out.push(c),
            }
        }
        out
    }
}

pub(crate) fn unsupported_lock(dialect: Dialect, mode: LockMode) -> CraftError {
    CraftError::unsupported(format!("{:?} row lock is not supported by {}", mode, dialect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerOptions;

    #[test]
    fn test_wrap_identifiers() {
        let options = CompilerOptions::default();
        let postgres = Dialect::Postgres.generator(&options);
        assert_eq!(postgres.wrap_identifiers("{a}.[b] = 1"), r#""a"."b" = 1"#);
        assert_eq!(postgres.wrap_identifiers(r"\{a\} \?"), r"{a} \?");

        let mysql = Dialect::MySQL.generator(&options);
        assert_eq!(mysql.wrap_identifiers("[a]"), "`a`");
    }

    #[test]
    fn test_wrap_aliases_and_dots() {
        let options = CompilerOptions::default();
        let sqlserver = Dialect::SqlServer.generator(&options);
        assert_eq!(sqlserver.wrap("dbo.users.id as Id"), "[dbo].[users].[id] AS [Id]");
        assert_eq!(sqlserver.wrap("users.*"), "[users].*");
        assert_eq!(sqlserver.wrap("we]ird"), "[we]]ird]");

        let oracle = Dialect::Oracle.generator(&options);
        assert_eq!(oracle.wrap("a as b"), r#""a" "b""#);
    }
}
