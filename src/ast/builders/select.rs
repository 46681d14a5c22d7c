//! Select list, grouping, ordering, paging and locking.

use crate::ast::clauses::{AggregateClause, Column, OrderBy};
use crate::ast::components::{ClauseKind, Component};
use crate::ast::operators::{AggregateFunc, LockMode, Method};
use crate::ast::query::Query;
use crate::ast::values::Value;
use crate::error::CraftError;

/// Expand `"users.{id, name}"` into `["users.id", "users.name"]`.
pub(crate) fn expand_columns(column: &str) -> Vec<String> {
    let column = column.trim();
    let open = column.find(".{").filter(|_| column.ends_with('}'));
    if let Some(open) = open {
        let prefix = &column[..open];
        let inner = &column[open + 2..column.len() - 1];
        return inner
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("{}.{}", prefix, c))
            .collect();
    }
    vec![column.to_string()]
}

impl Query {
    /// Add columns to the select list. Each entry may be `"col as alias"` or
    /// `"table.{a, b}"`.
    pub fn select<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.method = Method::Select;
        for col in cols {
            for column in expand_columns(col.as_ref()) {
                self = self.add_component(Component::Select, ClauseKind::Column(Column::Named(column)));
            }
        }
        self
    }

    pub fn select_raw<I, V>(mut self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.method = Method::Select;
        self.add_component(
            Component::Select,
            ClauseKind::Column(Column::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        )
    }

    /// `(subquery) AS alias` in the select list.
    pub fn select_query(mut self, query: Query, alias: impl Into<String>) -> Self {
        self.method = Method::Select;
        self.absorb(&query);
        let query = query.alias(alias);
        self.add_component(Component::Select, ClauseKind::Column(Column::Subquery(Box::new(query))))
    }

    /// `FUNC(col)` in the select list. `column` may carry `" as alias"`.
    pub fn select_aggregate(self, function: AggregateFunc, column: impl Into<String>) -> Self {
        self.add_aggregate_column(function, column.into(), None)
    }

    /// `FUNC(col)` restricted to the rows matching the conditions built by `filter`.
    pub fn select_aggregate_filtered(
        self,
        function: AggregateFunc,
        column: impl Into<String>,
        filter: impl FnOnce(Query) -> Query,
    ) -> Self {
        let filter = filter(self.child());
        self.add_aggregate_column(function, column.into(), Some(filter))
    }

    fn add_aggregate_column(mut self, function: AggregateFunc, column: String, filter: Option<Query>) -> Self {
        self.method = Method::Select;
        if let Some(filter) = &filter {
            self.absorb(filter);
        }
        self.add_component(
            Component::Select,
            ClauseKind::Column(Column::Aggregated {
                function,
                column,
                filter: filter.map(Box::new),
            }),
        )
    }

    pub fn select_count(self, column: impl Into<String>) -> Self {
        self.select_aggregate(AggregateFunc::Count, column)
    }

    pub fn select_sum(self, column: impl Into<String>) -> Self {
        self.select_aggregate(AggregateFunc::Sum, column)
    }

    pub fn select_avg(self, column: impl Into<String>) -> Self {
        self.select_aggregate(AggregateFunc::Avg, column)
    }

    pub fn select_min(self, column: impl Into<String>) -> Self {
        self.select_aggregate(AggregateFunc::Min, column)
    }

    pub fn select_max(self, column: impl Into<String>) -> Self {
        self.select_aggregate(AggregateFunc::Max, column)
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ---- Aggregate statements ----

    /// Turn the query into an aggregate over its rows.
    pub fn as_aggregate<I, S>(mut self, function: AggregateFunc, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.method = Method::Aggregate;
        let columns = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>();
        self.clear_component(Component::Aggregate).add_component(
            Component::Aggregate,
            ClauseKind::Aggregate(AggregateClause { function, columns }),
        )
    }

    /// `SELECT COUNT(*)`, or over the given columns.
    pub fn as_count<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>();
        if columns.is_empty() {
            self.as_aggregate(AggregateFunc::Count, ["*"])
        } else {
            self.as_aggregate(AggregateFunc::Count, columns)
        }
    }

    pub fn as_sum(self, column: impl AsRef<str>) -> Self {
        self.as_aggregate(AggregateFunc::Sum, [column])
    }

    pub fn as_avg(self, column: impl AsRef<str>) -> Self {
        self.as_aggregate(AggregateFunc::Avg, [column])
    }

    pub fn as_min(self, column: impl AsRef<str>) -> Self {
        self.as_aggregate(AggregateFunc::Min, [column])
    }

    pub fn as_max(self, column: impl AsRef<str>) -> Self {
        self.as_aggregate(AggregateFunc::Max, [column])
    }

    // ---- Grouping ----

    pub fn group_by<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for col in cols {
            self = self.add_component(
                Component::Group,
                ClauseKind::Column(Column::Named(col.as_ref().to_string())),
            );
        }
        self
    }

    pub fn group_by_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_component(
            Component::Group,
            ClauseKind::Column(Column::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        )
    }

    // ---- Ordering ----

    pub fn order_by(self, column: impl AsRef<str>) -> Self {
        self.add_component(
            Component::Order,
            ClauseKind::Order(OrderBy::Column {
                column: column.as_ref().to_string(),
                ascending: true,
            }),
        )
    }

    pub fn order_by_desc(self, column: impl AsRef<str>) -> Self {
        self.add_component(
            Component::Order,
            ClauseKind::Order(OrderBy::Column {
                column: column.as_ref().to_string(),
                ascending: false,
            }),
        )
    }

    pub fn order_by_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_component(
            Component::Order,
            ClauseKind::Order(OrderBy::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        )
    }

    pub fn order_by_random(self, seed: Option<&str>) -> Self {
        self.add_component(
            Component::Order,
            ClauseKind::Order(OrderBy::Random {
                seed: seed.map(str::to_string),
            }),
        )
    }

    // ---- Paging ----

    pub fn limit(self, n: u64) -> Self {
        self.replace_component(Component::Limit, ClauseKind::Limit(n))
    }

    pub fn offset(self, n: u64) -> Self {
        self.replace_component(Component::Offset, ClauseKind::Offset(n))
    }

    pub fn take(self, n: u64) -> Self {
        self.limit(n)
    }

    pub fn skip(self, n: u64) -> Self {
        self.offset(n)
    }

    /// One-based page of `per_page` rows.
    pub fn for_page(self, page: u64, per_page: u64) -> Self {
        match page.saturating_sub(1).checked_mul(per_page) {
            Some(offset) => self.offset(offset).limit(per_page),
            None => self.fail(CraftError::structural(format!(
                "Page {} of {} rows is out of range",
                page, per_page
            ))),
        }
    }

    // ---- Locking ----

    pub fn lock_for_update(self) -> Self {
        self.replace_component(Component::Lock, ClauseKind::Lock(LockMode::Update))
    }

    pub fn lock_for_share(self) -> Self {
        self.replace_component(Component::Lock, ClauseKind::Lock(LockMode::Share))
    }
}
