//! Aggregate statements become an aggregate over a derived table.

use crate::ast::{Clause, Component, Conditions, Method, Query};
use crate::transpiler::dialect::Dialect;

/// Rewrite an aggregate query into a plain select.
///
/// A single-column, non-distinct aggregate renders in place. Otherwise the
/// rows are produced by an inner select (distinct columns, or rows where
/// every aggregated column is non-null) and the outer select aggregates
/// `*` over it:
///
/// `SELECT COUNT(*) AS "count" FROM (SELECT DISTINCT ...) AS "countQuery"`
pub(crate) fn transform(query: &Query, engine: Option<Dialect>) -> Query {
    let mut inner = query.clone();
    inner.method = Method::Select;
    for component in [Component::Limit, Component::Offset, Component::Order, Component::Group] {
        inner.components.clear(component);
    }

    let Some(aggregate) = query
        .components
        .get_one(Component::Aggregate, engine)
        .and_then(Clause::as_aggregate)
        .cloned()
    else {
        return inner;
    };

    if aggregate.columns.len() == 1 && !query.distinct {
        return inner;
    }

    let inner = if query.distinct {
        inner.components.clear(Component::Aggregate);
        inner.components.clear(Component::Select);
        inner.select(aggregate.columns.iter())
    } else {
        aggregate
            .columns
            .iter()
            .fold(inner, |q, column| q.where_not_null(column))
    };

    let function = aggregate.function;
    let mut outer = query
        .child()
        .from_query(inner.alias(format!("{}Query", function.alias())))
        .as_aggregate(function, ["*"]);
    outer.method = Method::Select;
    outer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_stays_flat() {
        let query = Query::table("users").as_count(["id"]).limit(5).order_by("id");
        let transformed = transform(&query, None);
        assert_eq!(transformed.method, Method::Select);
        assert!(!transformed.has_component(Component::Limit, None));
        assert!(!transformed.has_component(Component::Order, None));
        assert!(transformed.get_from(None).is_some());
    }

    #[test]
    fn test_distinct_wraps() {
        let query = Query::table("users").distinct().as_count(["city", "country"]);
        let transformed = transform(&query, None);
        let from = transformed.get_from(None);
        assert_eq!(from.and_then(|f| f.alias()), Some("countQuery"));
    }
}
