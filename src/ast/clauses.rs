//! Clause payloads stored in a query's component list.

use serde::{Deserialize, Serialize};

use crate::ast::operators::{AggregateFunc, SetOp};
use crate::ast::query::Query;
use crate::ast::values::Value;

/// Split `"name as alias"` (case-insensitive) into its two halves.
pub(crate) fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    let idx = lower.rfind(" as ")?;
    let (name, alias) = (value[..idx].trim(), value[idx + 4..].trim());
    if name.is_empty() || alias.is_empty() {
        return None;
    }
    Some((name, alias))
}

/// A table source: FROM target, CTE body, or join target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromClause {
    /// Table name, optionally `"table as alias"`.
    Table(String),
    /// Derived table; the alias comes from the subquery.
    Subquery(Box<Query>),
    Raw {
        alias: Option<String>,
        expression: String,
        bindings: Vec<Value>,
    },
    /// Inline rows, rendered per dialect. Only valid as a CTE.
    AdHoc {
        alias: String,
        columns: Vec<String>,
        values: Vec<Value>,
    },
}

impl FromClause {
    pub fn alias(&self) -> Option<&str> {
        match self {
            FromClause::Table(table) => Some(split_alias(table).map_or(table.as_str(), |(_, a)| a)),
            FromClause::Subquery(query) => query.alias.as_deref(),
            FromClause::Raw { alias, .. } => alias.as_deref(),
            FromClause::AdHoc { alias, .. } => Some(alias),
        }
    }
}

/// A select-list entry (also used for GROUP BY).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Plain column, may carry `" as alias"`.
    Named(String),
    Subquery(Box<Query>),
    /// `FUNC(col)` with an optional filter built as a child query's wheres.
    Aggregated {
        function: AggregateFunc,
        column: String,
        filter: Option<Box<Query>>,
    },
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderBy {
    Column { column: String, ascending: bool },
    Random { seed: Option<String> },
    Raw { expression: String, bindings: Vec<Value> },
}

/// Aggregate applied to the whole select (`Method::Aggregate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateClause {
    pub function: AggregateFunc,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Combine {
    Query {
        operation: SetOp,
        all: bool,
        query: Box<Query>,
    },
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
}

/// One INSERT row, or a column list fed by a select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertClause {
    Values {
        columns: Vec<String>,
        values: Vec<Value>,
        return_id: bool,
    },
    Query {
        columns: Vec<String>,
        query: Box<Query>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpdateClause {
    Set {
        columns: Vec<String>,
        values: Vec<Value>,
    },
    /// `col = col + n`, negative `n` decrements.
    Increment { column: String, value: i64 },
}
