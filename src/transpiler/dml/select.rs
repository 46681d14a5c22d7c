//! SELECT rendering in fixed section order.

use crate::ast::clauses::split_alias;
use crate::ast::{Clause, Column, Combine, Component, FromClause, Join, JoinKind, Method, OrderBy, Query, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::conditions::compile_conditions;
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::{aggregate, pagination};
use crate::transpiler::traits::{Pagination, TableHint};

/// Limit / offset still to be rendered after the select head consumed any.
#[derive(Debug, Clone, Copy)]
struct Paging {
    limit: u64,
    offset: u64,
}

/// Compile a select (or a subquery) inside its own variable scope.
pub fn compile_select(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    ctx.enter(query);
    let sql = select_body(ctx, query);
    ctx.leave();
    sql
}

pub(crate) fn select_body(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    if query.method == Method::Aggregate {
        let transformed = aggregate::transform(query, engine);
        return compile_sections(ctx, &transformed);
    }

    match ctx.generator.pagination() {
        Pagination::TopRowNumber if query.has_offset(engine) => pagination::row_number(ctx, query),
        Pagination::RowNum if query.has_limit(engine) || query.has_offset(engine) => {
            pagination::rownum(ctx, query)
        }
        _ => compile_sections(ctx, query),
    }
}

/// Columns, from, joins, where, group by, having, order by, limit,
/// combine, lock. Empty sections are dropped.
pub(crate) fn compile_sections(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    let mut paging = Paging {
        limit: query.get_limit(engine),
        offset: query.get_offset(engine),
    };

    let parts = [
        Some(compile_columns(ctx, query, &mut paging)?),
        compile_from(ctx, query)?,
        compile_joins(ctx, query)?,
        compile_wheres(ctx, query)?,
        compile_groups(ctx, query)?,
        compile_havings(ctx, query)?,
        compile_orders(ctx, query)?,
        compile_limit(ctx, query, paging)?,
        compile_combines(ctx, query)?,
        compile_lock(ctx, query)?,
    ];

    Ok(parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" "))
}

fn compile_columns(ctx: &mut Ctx, query: &Query, paging: &mut Paging) -> CraftResult<String> {
    let engine = ctx.engine();

    // Head modifiers bind before the column list.
    let mut before_distinct = None;
    let mut after_distinct = None;
    match ctx.generator.pagination() {
        Pagination::TopRowNumber if paging.limit > 0 && paging.offset == 0 => {
            let placeholder = ctx.parameter(&Value::from(paging.limit))?;
            after_distinct = Some(format!("TOP ({}) ", placeholder));
            paging.limit = 0;
        }
        Pagination::FirstSkip if paging.limit > 0 && paging.offset == 0 => {
            let placeholder = ctx.parameter(&Value::from(paging.limit))?;
            before_distinct = Some(format!("FIRST {} ", placeholder));
            paging.limit = 0;
        }
        Pagination::FirstSkip if paging.offset > 0 && paging.limit == 0 => {
            let placeholder = ctx.parameter(&Value::from(paging.offset))?;
            before_distinct = Some(format!("SKIP {} ", placeholder));
            paging.offset = 0;
        }
        _ => {}
    }

    let aggregate = query
        .components
        .get_one(Component::Aggregate, engine)
        .and_then(Clause::as_aggregate);

    let (distinct, body) = match aggregate {
        Some(aggregate) if aggregate.columns.len() == 1 => {
            let column = ctx.wrap(&aggregate.columns[0]);
            let body = format!(
                "{}({}) {}{}",
                aggregate.function,
                column,
                ctx.generator.column_alias_keyword(),
                ctx.quote(aggregate.function.alias())
            );
            ("", body)
        }
        Some(_) => ("", "1".to_string()),
        None => {
            let columns = query
                .components
                .get(Component::Select, engine)
                .filter_map(Clause::as_column)
                .map(|column| compile_column(ctx, column))
                .collect::<CraftResult<Vec<_>>>()?;
            let body = if columns.is_empty() {
                "*".to_string()
            } else {
                columns.join(", ")
            };
            (if query.distinct { "DISTINCT " } else { "" }, body)
        }
    };

    Ok(format!(
        "SELECT {}{}{}{}",
        before_distinct.unwrap_or_default(),
        distinct,
        after_distinct.unwrap_or_default(),
        body
    ))
}

pub(crate) fn compile_column(ctx: &mut Ctx, column: &Column) -> CraftResult<String> {
    match column {
        Column::Named(name) => Ok(ctx.wrap(name)),
        Column::Raw {
            expression,
            bindings,
        } => ctx.raw(expression, bindings),
        Column::Subquery(query) => {
            let sql = compile_select(ctx, query)?;
            let alias = query
                .alias
                .as_deref()
                .map(|a| format!(" {}{}", ctx.generator.column_alias_keyword(), ctx.quote(a)))
                .unwrap_or_default();
            Ok(format!("({}){}", sql, alias))
        }
        Column::Aggregated {
            function,
            column,
            filter,
        } => {
            let (name, alias) = match split_alias(column) {
                Some((name, alias)) => (name, Some(alias)),
                None => (column.as_str(), None),
            };
            let wrapped = ctx.wrap(name);
            let alias = alias
                .map(|a| format!(" {}{}", ctx.generator.column_alias_keyword(), ctx.quote(a)))
                .unwrap_or_default();

            let conditions = match filter {
                Some(filter) => {
                    let engine = ctx.engine();
                    ctx.enter(filter);
                    let sql = compile_conditions(
                        ctx,
                        filter
                            .components
                            .get(Component::Where, engine)
                            .filter_map(Clause::as_condition),
                    );
                    ctx.leave();
                    sql?
                }
                None => String::new(),
            };

            if conditions.is_empty() {
                Ok(format!("{}({}){}", function, wrapped, alias))
            } else if ctx.generator.supports_filter_clause() {
                Ok(format!("{}({}) FILTER (WHERE {}){}", function, wrapped, conditions, alias))
            } else {
                Ok(format!("{}(CASE WHEN {} THEN {} END){}", function, conditions, wrapped, alias))
            }
        }
    }
}

/// A table source with optional hints.
pub(crate) fn compile_table_expression(
    ctx: &mut Ctx,
    from: &FromClause,
    hints: &[TableHint],
) -> CraftResult<String> {
    match from {
        FromClause::Table(table) => Ok(format!(
            "{}{}",
            ctx.wrap_table(table),
            ctx.generator.table_hints(hints)
        )),
        FromClause::Subquery(query) => {
            let sql = compile_select(ctx, query)?;
            let alias = query
                .alias
                .as_deref()
                .map(|a| format!(" {}{}", ctx.generator.table_alias_keyword(), ctx.quote(a)))
                .unwrap_or_default();
            Ok(format!("({}){}", sql, alias))
        }
        FromClause::Raw {
            expression,
            bindings,
            ..
        } => ctx.raw(expression, bindings),
        FromClause::AdHoc { alias, .. } => Err(CraftError::structural(format!(
            "Ad-hoc table '{}' can only be used as a CTE",
            alias
        ))),
    }
}

fn compile_from(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let Some(from) = query.get_from(engine) else {
        return Ok(None);
    };

    let lock = query
        .components
        .get_one(Component::Lock, engine)
        .and_then(Clause::as_lock)
        .filter(|_| ctx.generator.lock_as_table_hint());
    let hints = match lock {
        Some(mode) => vec![TableHint::Lock(mode)],
        None if ctx.options.no_lock => vec![TableHint::NoLock],
        None => Vec::new(),
    };

    let table = compile_table_expression(ctx, from, &hints)?;
    Ok(Some(format!("FROM {}", table)))
}

pub(crate) fn compile_joins(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let joins = query
        .components
        .get(Component::Join, engine)
        .filter_map(Clause::as_join)
        .map(|join| compile_join(ctx, join))
        .collect::<CraftResult<Vec<_>>>()?;
    Ok(if joins.is_empty() { None } else { Some(joins.join(" ")) })
}

fn compile_join(ctx: &mut Ctx, join: &Join) -> CraftResult<String> {
    let engine = ctx.engine();
    let from = join
        .get_from(engine)
        .ok_or_else(|| CraftError::structural("Join without a table"))?;

    let mut hints = Vec::new();
    if ctx.options.no_lock {
        hints.push(TableHint::NoLock);
    }
    if let Some(index) = &join.index {
        hints.push(TableHint::Index(index.clone()));
    }

    let table = compile_table_expression(ctx, from, &hints)?;
    let constraints = compile_conditions(
        ctx,
        join.components
            .get(Component::Where, engine)
            .filter_map(Clause::as_condition),
    )?;

    if constraints.is_empty() || join.kind == JoinKind::Cross {
        Ok(format!("{} {}", join.kind.keyword(), table))
    } else {
        Ok(format!("{} {} ON {}", join.kind.keyword(), table, constraints))
    }
}

pub(crate) fn compile_wheres(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let sql = compile_conditions(
        ctx,
        query
            .components
            .get(Component::Where, engine)
            .filter_map(Clause::as_condition),
    )?;
    Ok(if sql.is_empty() { None } else { Some(format!("WHERE {}", sql)) })
}

fn compile_groups(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let columns = query
        .components
        .get(Component::Group, engine)
        .filter_map(Clause::as_column)
        .map(|column| compile_column(ctx, column))
        .collect::<CraftResult<Vec<_>>>()?;
    Ok(if columns.is_empty() {
        None
    } else {
        Some(format!("GROUP BY {}", columns.join(", ")))
    })
}

fn compile_havings(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let sql = compile_conditions(
        ctx,
        query
            .components
            .get(Component::Having, engine)
            .filter_map(Clause::as_condition),
    )?;
    Ok(if sql.is_empty() { None } else { Some(format!("HAVING {}", sql)) })
}

pub(crate) fn compile_orders(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let orders = query
        .components
        .get(Component::Order, engine)
        .filter_map(Clause::as_order)
        .map(|order| match order {
            OrderBy::Column { column, ascending } => Ok(format!(
                "{}{}",
                ctx.wrap(column),
                if *ascending { "" } else { " DESC" }
            )),
            OrderBy::Random { seed } => Ok(ctx.generator.random_order(seed.as_deref())),
            OrderBy::Raw {
                expression,
                bindings,
            } => ctx.raw(expression, bindings),
        })
        .collect::<CraftResult<Vec<_>>>()?;
    Ok(if orders.is_empty() {
        None
    } else {
        Some(format!("ORDER BY {}", orders.join(", ")))
    })
}

fn compile_limit(ctx: &mut Ctx, query: &Query, paging: Paging) -> CraftResult<Option<String>> {
    let Paging { limit, offset } = paging;
    if limit == 0 && offset == 0 {
        return Ok(None);
    }

    match ctx.generator.pagination() {
        Pagination::LimitOffset { unbounded } => {
            if offset == 0 {
                let limit = ctx.parameter(&Value::from(limit))?;
                return Ok(Some(format!("LIMIT {}", limit)));
            }
            if limit == 0 {
                let offset = ctx.parameter(&Value::from(offset))?;
                return Ok(Some(match unbounded {
                    Some(max) => format!("LIMIT {} OFFSET {}", max, offset),
                    None => format!("OFFSET {}", offset),
                }));
            }
            let limit = ctx.parameter(&Value::from(limit))?;
            let offset = ctx.parameter(&Value::from(offset))?;
            Ok(Some(format!("LIMIT {} OFFSET {}", limit, offset)))
        }
        Pagination::OffsetFetch { safe_order } => {
            let safe_order = if query.has_component(Component::Order, ctx.engine()) {
                ""
            } else {
                safe_order
            };
            let offset = ctx.parameter(&Value::from(offset))?;
            if limit == 0 {
                return Ok(Some(format!("{}OFFSET {} ROWS", safe_order, offset)));
            }
            let limit = ctx.parameter(&Value::from(limit))?;
            Ok(Some(format!(
                "{}OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                safe_order, offset, limit
            )))
        }
        Pagination::FirstSkip => {
            let first = ctx.parameter(&Value::from(pagination::first_row(offset)?))?;
            let last = ctx.parameter(&Value::from(pagination::last_row(limit, offset)?))?;
            Ok(Some(format!("ROWS {} TO {}", first, last)))
        }
        // Rewritten around the whole statement.
        Pagination::TopRowNumber | Pagination::RowNum => Ok(None),
    }
}

fn compile_combines(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let combines = query
        .components
        .get(Component::Combine, engine)
        .filter_map(Clause::as_combine)
        .map(|combine| match combine {
            Combine::Query {
                operation,
                all,
                query,
            } => {
                let sql = compile_select(ctx, query)?;
                Ok(format!(
                    "{} {}{}",
                    operation.keyword(),
                    if *all { "ALL " } else { "" },
                    sql
                ))
            }
            Combine::Raw {
                expression,
                bindings,
            } => ctx.raw(expression, bindings),
        })
        .collect::<CraftResult<Vec<_>>>()?;
    Ok(if combines.is_empty() { None } else { Some(combines.join(" ")) })
}

fn compile_lock(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let Some(mode) = query
        .components
        .get_one(Component::Lock, ctx.engine())
        .and_then(Clause::as_lock)
    else {
        return Ok(None);
    };
    if ctx.generator.lock_as_table_hint() {
        return Ok(None);
    }
    ctx.generator.lock_clause(mode).map(Some)
}
