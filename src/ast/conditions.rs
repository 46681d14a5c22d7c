use serde::{Deserialize, Serialize};

use crate::ast::operators::{DatePart, Operator, StringMatch};
use crate::ast::query::Query;
use crate::ast::values::Value;

/// A single WHERE / HAVING / ON condition.
///
/// `is_or` picks the connective placed before this condition when it is not
/// the first of its list; `is_not` negates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub is_or: bool,
    pub is_not: bool,
    pub kind: ConditionKind,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            is_or: false,
            is_not: false,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionKind {
    /// `col op ?`
    Basic {
        column: String,
        operator: Operator,
        value: Value,
    },
    /// LIKE with a pattern shape, optionally case-insensitive.
    BasicString {
        column: String,
        matching: StringMatch,
        value: Value,
        case_sensitive: bool,
        escape: Option<char>,
    },
    /// Compare one date part of a column.
    BasicDate {
        part: DatePart,
        column: String,
        operator: Operator,
        value: Value,
    },
    /// `a op b`, both identifiers
    TwoColumns {
        first: String,
        operator: Operator,
        second: String,
    },
    Null {
        column: String,
    },
    Boolean {
        column: String,
        value: bool,
    },
    Between {
        column: String,
        lower: Value,
        higher: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    InSubquery {
        column: String,
        query: Box<Query>,
    },
    Exists {
        query: Box<Query>,
    },
    /// Parenthesized group holding the conditions of a child query.
    Nested {
        query: Box<Query>,
    },
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
    /// `(subquery) op ?`
    SubqueryComparison {
        query: Box<Query>,
        operator: Operator,
        value: Value,
    },
    /// `col op (subquery)`
    ColumnSubquery {
        column: String,
        operator: Operator,
        query: Box<Query>,
    },
}
