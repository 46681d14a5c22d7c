//! Condition builders shared by queries (WHERE) and joins (ON).

use crate::ast::components::{ClauseKind, Component};
use crate::ast::conditions::{Condition, ConditionKind};
use crate::ast::joins::Join;
use crate::ast::operators::{DatePart, Operator, StringMatch};
use crate::ast::query::{Pending, Query};
use crate::ast::values::Value;
use crate::error::CraftError;

fn condition(pending: Pending, kind: ConditionKind) -> Condition {
    Condition {
        is_or: pending.or,
        is_not: pending.not,
        kind,
    }
}

fn values<I, V>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    values.into_iter().map(Into::into).collect()
}

/// Fluent condition API.
///
/// Implementors supply storage for a condition plus the `or`/`not`
/// modifiers; every builder below consumes the pending modifiers.
pub trait Conditions: Sized {
    /// Append a condition built from the pending modifiers.
    fn add_condition(self, kind: ConditionKind) -> Self;

    /// Empty child query for groups and subqueries.
    fn child_query(&self) -> Query;

    fn or(self) -> Self;

    fn not(self) -> Self;

    /// Drop pending modifiers without adding anything.
    fn reset_pending(self) -> Self;

    fn record_error(self, err: CraftError) -> Self;

    fn inherit_error(self, query: &Query) -> Self {
        match query.error() {
            Some(err) => self.record_error(err.clone()),
            None => self,
        }
    }

    /// `col op value`. A null value becomes `IS [NOT] NULL`, a boolean
    /// compared with `=`/`<>` becomes a boolean condition.
    fn filter(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        let column = column.as_ref().to_string();
        match value.into() {
            Value::Null => {
                let this = if op == Operator::Eq { self } else { self.not() };
                this.add_condition(ConditionKind::Null { column })
            }
            Value::Bool(value) if matches!(op, Operator::Eq | Operator::Ne | Operator::NotEq) => {
                let this = if op == Operator::Eq { self } else { self.not() };
                this.add_condition(ConditionKind::Boolean { column, value })
            }
            value => self.add_condition(ConditionKind::Basic {
                column,
                operator: op,
                value,
            }),
        }
    }

    fn or_filter(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.or().filter(column, op, value)
    }

    fn filter_not(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.not().filter(column, op, value)
    }

    fn or_filter_not(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.or().not().filter(column, op, value)
    }

    fn where_eq(self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.filter(column, Operator::Eq, value)
    }

    fn or_where_eq(self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.or().filter(column, Operator::Eq, value)
    }

    /// Compare two columns.
    fn where_columns(self, first: impl AsRef<str>, op: Operator, second: impl AsRef<str>) -> Self {
        self.add_condition(ConditionKind::TwoColumns {
            first: first.as_ref().to_string(),
            operator: op,
            second: second.as_ref().to_string(),
        })
    }

    fn or_where_columns(self, first: impl AsRef<str>, op: Operator, second: impl AsRef<str>) -> Self {
        self.or().where_columns(first, op, second)
    }

    fn where_null(self, column: impl AsRef<str>) -> Self {
        self.add_condition(ConditionKind::Null {
            column: column.as_ref().to_string(),
        })
    }

    fn where_not_null(self, column: impl AsRef<str>) -> Self {
        self.not().where_null(column)
    }

    fn or_where_null(self, column: impl AsRef<str>) -> Self {
        self.or().where_null(column)
    }

    fn or_where_not_null(self, column: impl AsRef<str>) -> Self {
        self.or().not().where_null(column)
    }

    fn where_true(self, column: impl AsRef<str>) -> Self {
        self.add_condition(ConditionKind::Boolean {
            column: column.as_ref().to_string(),
            value: true,
        })
    }

    fn where_false(self, column: impl AsRef<str>) -> Self {
        self.add_condition(ConditionKind::Boolean {
            column: column.as_ref().to_string(),
            value: false,
        })
    }

    /// Pattern match with full control over case and escape character.
    fn where_string(
        self,
        column: impl AsRef<str>,
        matching: StringMatch,
        value: impl Into<Value>,
        case_sensitive: bool,
        escape: Option<char>,
    ) -> Self {
        self.add_condition(ConditionKind::BasicString {
            column: column.as_ref().to_string(),
            matching,
            value: value.into(),
            case_sensitive,
            escape,
        })
    }

    /// Case-insensitive LIKE with the pattern used verbatim.
    fn where_like(self, column: impl AsRef<str>, pattern: impl Into<Value>) -> Self {
        self.where_string(column, StringMatch::Like, pattern, false, None)
    }

    fn or_where_like(self, column: impl AsRef<str>, pattern: impl Into<Value>) -> Self {
        self.or().where_like(column, pattern)
    }

    fn where_not_like(self, column: impl AsRef<str>, pattern: impl Into<Value>) -> Self {
        self.not().where_like(column, pattern)
    }

    fn where_starts(self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.where_string(column, StringMatch::Starts, value, false, None)
    }

    fn where_ends(self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.where_string(column, StringMatch::Ends, value, false, None)
    }

    fn where_contains(self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.where_string(column, StringMatch::Contains, value, false, None)
    }

    fn where_between(
        self,
        column: impl AsRef<str>,
        lower: impl Into<Value>,
        higher: impl Into<Value>,
    ) -> Self {
        self.add_condition(ConditionKind::Between {
            column: column.as_ref().to_string(),
            lower: lower.into(),
            higher: higher.into(),
        })
    }

    fn where_not_between(
        self,
        column: impl AsRef<str>,
        lower: impl Into<Value>,
        higher: impl Into<Value>,
    ) -> Self {
        self.not().where_between(column, lower, higher)
    }

    fn or_where_between(
        self,
        column: impl AsRef<str>,
        lower: impl Into<Value>,
        higher: impl Into<Value>,
    ) -> Self {
        self.or().where_between(column, lower, higher)
    }

    /// `col IN (...)`. An empty list compiles to an always-false predicate.
    fn where_in<I, V>(self, column: impl AsRef<str>, list: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_condition(ConditionKind::In {
            column: column.as_ref().to_string(),
            values: values(list),
        })
    }

    fn where_not_in<I, V>(self, column: impl AsRef<str>, list: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.not().where_in(column, list)
    }

    fn or_where_in<I, V>(self, column: impl AsRef<str>, list: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().where_in(column, list)
    }

    fn or_where_not_in<I, V>(self, column: impl AsRef<str>, list: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().not().where_in(column, list)
    }

    fn where_in_query(self, column: impl AsRef<str>, query: Query) -> Self {
        self.inherit_error(&query)
            .add_condition(ConditionKind::InSubquery {
                column: column.as_ref().to_string(),
                query: Box::new(query),
            })
    }

    fn where_not_in_query(self, column: impl AsRef<str>, query: Query) -> Self {
        self.not().where_in_query(column, query)
    }

    /// `(subquery) op value`
    fn where_sub(self, query: Query, op: Operator, value: impl Into<Value>) -> Self {
        self.inherit_error(&query)
            .add_condition(ConditionKind::SubqueryComparison {
                query: Box::new(query),
                operator: op,
                value: value.into(),
            })
    }

    /// `col op (subquery)`
    fn where_column_query(self, column: impl AsRef<str>, op: Operator, query: Query) -> Self {
        self.inherit_error(&query)
            .add_condition(ConditionKind::ColumnSubquery {
                column: column.as_ref().to_string(),
                operator: op,
                query: Box::new(query),
            })
    }

    /// `EXISTS (subquery)`. The subquery needs its own FROM.
    fn where_exists(self, query: Query) -> Self {
        if !query.has_component(Component::From, None) {
            return self.reset_pending().record_error(CraftError::structural(
                "Expected a 'from' clause on the EXISTS subquery",
            ));
        }
        self.inherit_error(&query)
            .add_condition(ConditionKind::Exists {
                query: Box::new(query),
            })
    }

    fn where_not_exists(self, query: Query) -> Self {
        self.not().where_exists(query)
    }

    fn or_where_exists(self, query: Query) -> Self {
        self.or().where_exists(query)
    }

    /// Raw predicate. `{name}`/`[name]` are quoted for the dialect, each `?`
    /// takes one binding.
    fn where_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.add_condition(ConditionKind::Raw {
            expression: expression.into(),
            bindings: values(bindings),
        })
    }

    fn or_where_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().where_raw(expression, bindings)
    }

    /// Parenthesized group. A group left without conditions is dropped.
    fn where_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        let child = f(self.child_query());
        let this = self.inherit_error(&child);
        if !child.has_component(Component::Where, None) {
            return this.reset_pending();
        }
        this.add_condition(ConditionKind::Nested {
            query: Box::new(child),
        })
    }

    fn or_where_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.or().where_group(f)
    }

    fn where_not_group(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.not().where_group(f)
    }

    fn where_date_part(
        self,
        part: DatePart,
        column: impl AsRef<str>,
        op: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.add_condition(ConditionKind::BasicDate {
            part,
            column: column.as_ref().to_string(),
            operator: op,
            value: value.into(),
        })
    }

    fn where_date(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Date, column, op, value)
    }

    fn where_time(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.where_date_part(DatePart::Time, column, op, value)
    }
}

impl Query {
    pub(crate) fn push_condition(mut self, component: Component, kind: ConditionKind) -> Self {
        let pending = self.take_pending();
        self.add_component(component, ClauseKind::Condition(condition(pending, kind)))
    }

    /// `HAVING col op value`
    pub fn having(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.push_condition(
            Component::Having,
            ConditionKind::Basic {
                column: column.as_ref().to_string(),
                operator: op,
                value: value.into(),
            },
        )
    }

    pub fn or_having(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.or().having(column, op, value)
    }

    pub fn having_not(self, column: impl AsRef<str>, op: Operator, value: impl Into<Value>) -> Self {
        self.not().having(column, op, value)
    }

    pub fn having_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_condition(
            Component::Having,
            ConditionKind::Raw {
                expression: expression.into(),
                bindings: values(bindings),
            },
        )
    }

    pub fn or_having_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or().having_raw(expression, bindings)
    }

    pub fn having_between(
        self,
        column: impl AsRef<str>,
        lower: impl Into<Value>,
        higher: impl Into<Value>,
    ) -> Self {
        self.push_condition(
            Component::Having,
            ConditionKind::Between {
                column: column.as_ref().to_string(),
                lower: lower.into(),
                higher: higher.into(),
            },
        )
    }

    pub fn having_in<I, V>(self, column: impl AsRef<str>, list: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_condition(
            Component::Having,
            ConditionKind::In {
                column: column.as_ref().to_string(),
                values: values(list),
            },
        )
    }
}

impl Conditions for Query {
    fn add_condition(self, kind: ConditionKind) -> Self {
        self.push_condition(Component::Where, kind)
    }

    fn child_query(&self) -> Query {
        self.child()
    }

    fn or(self) -> Self {
        Query::or(self)
    }

    fn not(self) -> Self {
        Query::not(self)
    }

    fn reset_pending(mut self) -> Self {
        self.take_pending();
        self
    }

    fn record_error(self, err: CraftError) -> Self {
        self.fail(err)
    }
}

impl Conditions for Join {
    fn add_condition(mut self, kind: ConditionKind) -> Self {
        let pending = std::mem::take(&mut self.pending);
        self.components.add(crate::ast::components::Clause::new(
            Component::Where,
            self.engine_scope,
            ClauseKind::Condition(condition(pending, kind)),
        ));
        self
    }

    fn child_query(&self) -> Query {
        Query {
            parent: self.parent.clone(),
            engine_scope: self.engine_scope,
            ..Query::default()
        }
    }

    fn or(mut self) -> Self {
        self.pending.or = true;
        self
    }

    fn not(mut self) -> Self {
        self.pending.not = !self.pending.not;
        self
    }

    fn reset_pending(mut self) -> Self {
        self.pending = Pending::default();
        self
    }

    fn record_error(mut self, err: CraftError) -> Self {
        self.error.get_or_insert(err);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::components::Clause;

    fn wheres(query: &Query) -> Vec<&Condition> {
        query
            .components
            .get(Component::Where, None)
            .filter_map(Clause::as_condition)
            .collect()
    }

    #[test]
    fn test_pending_modifiers_reset() {
        let query = Query::table("t")
            .where_eq("a", 1)
            .or()
            .not()
            .where_eq("b", 2)
            .where_eq("c", 3);

        let conds = wheres(&query);
        assert!(!conds[0].is_or && !conds[0].is_not);
        assert!(conds[1].is_or && conds[1].is_not);
        assert!(!conds[2].is_or && !conds[2].is_not);
    }

    #[test]
    fn test_null_and_bool_normalization() {
        let query = Query::table("t")
            .filter("deleted_at", Operator::Eq, Value::Null)
            .filter("active", Operator::Ne, true);
        let conds = wheres(&query);
        assert!(matches!(conds[0].kind, ConditionKind::Null { .. }) && !conds[0].is_not);
        assert!(matches!(conds[1].kind, ConditionKind::Boolean { value: true, .. }) && conds[1].is_not);
    }

    #[test]
    fn test_empty_group_is_elided() {
        let query = Query::table("t").or().where_group(|q| q).where_eq("a", 1);
        let conds = wheres(&query);
        assert_eq!(conds.len(), 1);
        assert!(!conds[0].is_or);
    }

    #[test]
    fn test_exists_requires_from() {
        let query = Query::table("t").where_exists(Query::new().where_eq("a", 1));
        assert!(matches!(query.error(), Some(CraftError::Structural(_))));
    }
}
