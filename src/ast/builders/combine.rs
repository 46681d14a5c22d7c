//! Set operations and common table expressions.

use crate::ast::clauses::{Combine, FromClause};
use crate::ast::components::{ClauseKind, Component};
use crate::ast::operators::{Method, SetOp};
use crate::ast::query::Query;
use crate::ast::values::Value;
use crate::error::CraftError;

impl Query {
    pub fn combine(mut self, operation: SetOp, all: bool, query: Query) -> Self {
        if self.method != Method::Select || query.method != Method::Select {
            return self.fail(CraftError::unsupported(
                "Only select queries can be combined",
            ));
        }
        self.absorb(&query);
        self.add_component(
            Component::Combine,
            ClauseKind::Combine(Combine::Query {
                operation,
                all,
                query: Box::new(query),
            }),
        )
    }

    pub fn union(self, query: Query) -> Self {
        self.combine(SetOp::Union, false, query)
    }

    pub fn union_all(self, query: Query) -> Self {
        self.combine(SetOp::Union, true, query)
    }

    pub fn except(self, query: Query) -> Self {
        self.combine(SetOp::Except, false, query)
    }

    pub fn except_all(self, query: Query) -> Self {
        self.combine(SetOp::Except, true, query)
    }

    pub fn intersect(self, query: Query) -> Self {
        self.combine(SetOp::Intersect, false, query)
    }

    pub fn intersect_all(self, query: Query) -> Self {
        self.combine(SetOp::Intersect, true, query)
    }

    /// Append raw text such as `"UNION SELECT ..."`.
    pub fn combine_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.method != Method::Select {
            return self.fail(CraftError::unsupported(
                "Only select queries can be combined",
            ));
        }
        self.add_component(
            Component::Combine,
            ClauseKind::Combine(Combine::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        )
    }

    // ---- CTEs ----

    /// `WITH alias AS (query)`
    pub fn with(self, alias: impl Into<String>, query: Query) -> Self {
        self.with_query(query.alias(alias))
    }

    /// Add a CTE named by the query's own alias.
    pub fn with_query(mut self, query: Query) -> Self {
        if query.alias.is_none() {
            return self.fail(CraftError::structural("No alias found for the CTE query"));
        }
        self.absorb(&query);
        self.add_component(Component::Cte, ClauseKind::From(FromClause::Subquery(Box::new(query))))
    }

    pub fn with_raw<I, V>(self, alias: impl Into<String>, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_component(
            Component::Cte,
            ClauseKind::From(FromClause::Raw {
                alias: Some(alias.into()),
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        )
    }

    /// CTE over inline rows, e.g. `with_values("t", ["a", "b"], [[1, 2], [3, 4]])`.
    pub fn with_values<C, S, R, I, V>(self, alias: impl Into<String>, columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let rows: Vec<Vec<Value>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        if columns.is_empty() || rows.is_empty() {
            return self.fail(CraftError::structural(
                "Columns and values cannot be empty for an ad-hoc CTE",
            ));
        }
        if rows.iter().any(|row| row.len() != columns.len()) {
            return self.fail(CraftError::structural(
                "Columns count should be equal to each values count",
            ));
        }

        self.add_component(
            Component::Cte,
            ClauseKind::From(FromClause::AdHoc {
                alias: alias.into(),
                columns,
                values: rows.into_iter().flatten().collect(),
            }),
        )
    }
}
