//! Row-number based paging for engines without LIMIT / OFFSET.

use crate::ast::{Clause, ClauseKind, Column, Component, Query, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::{compile_orders, compile_sections};

/// One-based number of the first row after `offset`.
pub(crate) fn first_row(offset: u64) -> CraftResult<u64> {
    offset
        .checked_add(1)
        .ok_or_else(|| CraftError::structural(format!("Offset {} is out of range", offset)))
}

/// One-based number of the last row of the page.
pub(crate) fn last_row(limit: u64, offset: u64) -> CraftResult<u64> {
    limit.checked_add(offset).ok_or_else(|| {
        CraftError::structural(format!(
            "Limit {} with offset {} is out of range",
            limit, offset
        ))
    })
}

/// `ROW_NUMBER()` window wrapped in a range filter.
///
/// ```sql
/// SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY ...) AS [row_num] FROM ...)
///     AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?
/// ```
pub(crate) fn row_number(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    let limit = query.get_limit(engine);
    let offset = query.get_offset(engine);
    tracing::trace!(limit, offset, "wrapping select in ROW_NUMBER() window");

    // The order text moves into the window, its bindings with it.
    let mark = ctx.bindings.len();
    let order = compile_orders(ctx, query)?.unwrap_or_else(|| "ORDER BY (SELECT 0)".to_string());
    let order_bindings = ctx.bindings.split_off(mark);

    let mut inner = query.clone();
    for component in [Component::Limit, Component::Offset, Component::Order] {
        inner.components.clear(component);
    }
    if !inner.has_component(Component::Select, engine) {
        inner.components.add(Clause::new(
            Component::Select,
            None,
            ClauseKind::Column(Column::Named("*".to_string())),
        ));
    }
    inner.components.add(Clause::new(
        Component::Select,
        None,
        ClauseKind::Column(Column::Raw {
            expression: format!("ROW_NUMBER() OVER ({}) AS {}", order, ctx.quote("row_num")),
            bindings: order_bindings,
        }),
    ));

    let body = compile_sections(ctx, &inner)?;
    let row_num = ctx.quote("row_num");
    let wrapper = ctx.quote("results_wrapper");
    let first = ctx.parameter(&Value::from(first_row(offset)?))?;
    let filter = if limit > 0 {
        let last = ctx.parameter(&Value::from(last_row(limit, offset)?))?;
        format!("{} BETWEEN {} AND {}", row_num, first, last)
    } else {
        format!("{} >= {}", row_num, first)
    };

    Ok(format!(
        "SELECT * FROM ({}) {}{} WHERE {}",
        body,
        ctx.generator.table_alias_keyword(),
        wrapper,
        filter
    ))
}

/// Nested `ROWNUM` wrappers.
pub(crate) fn rownum(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    let limit = query.get_limit(engine);
    let offset = query.get_offset(engine);
    tracing::trace!(limit, offset, "wrapping select in ROWNUM filters");

    let mut inner = query.clone();
    inner.components.clear(Component::Limit);
    inner.components.clear(Component::Offset);
    let body = compile_sections(ctx, &inner)?;

    let row_num = ctx.quote("row_num");
    let wrapper = ctx.quote("results_wrapper");

    if limit == 0 {
        let offset = ctx.parameter(&Value::from(offset))?;
        return Ok(format!(
            "SELECT * FROM (SELECT {wrapper}.*, ROWNUM {row_num} FROM ({body}) {wrapper}) WHERE {row_num} > {offset}"
        ));
    }

    if offset == 0 {
        let limit = ctx.parameter(&Value::from(limit))?;
        return Ok(format!("SELECT * FROM ({body}) WHERE ROWNUM <= {limit}"));
    }

    let last = ctx.parameter(&Value::from(last_row(limit, offset)?))?;
    let offset = ctx.parameter(&Value::from(offset))?;
    Ok(format!(
        "SELECT * FROM (SELECT {wrapper}.*, ROWNUM {row_num} FROM ({body}) {wrapper} WHERE ROWNUM <= {last}) WHERE {row_num} > {offset}"
    ))
}
