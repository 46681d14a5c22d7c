//! `WITH` prologue.

use crate::ast::{Clause, Component, FromClause, Query, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::compile_select;
use crate::transpiler::traits::AdHocStyle;

/// CTEs of `query` and of every CTE body, innermost first, unique by alias.
fn collect<'q>(query: &'q Query, ctx: &Ctx, out: &mut Vec<&'q FromClause>) {
    let engine = ctx.engine();
    for from in query
        .components
        .get(Component::Cte, engine)
        .filter_map(Clause::as_from)
    {
        if let FromClause::Subquery(body) = from {
            collect(body, ctx, out);
        }
        let duplicate = from.alias().is_some()
            && out.iter().any(|seen| seen.alias() == from.alias());
        if !duplicate {
            out.push(from);
        }
    }
}

/// `WITH a AS (...), b AS (...)`, or `None` without CTEs.
pub(crate) fn compile_ctes(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let mut ctes = Vec::new();
    collect(query, ctx, &mut ctes);
    if ctes.is_empty() {
        return Ok(None);
    }
    tracing::trace!(count = ctes.len(), "hoisted common table expressions");
    for alias in ctes.iter().filter_map(|cte| cte.alias()) {
        ctx.register_cte(alias);
    }

    let parts = ctes
        .into_iter()
        .map(|cte| compile_cte(ctx, cte))
        .collect::<CraftResult<Vec<_>>>()?;
    Ok(Some(format!("WITH {}", parts.join(", "))))
}

fn compile_cte(ctx: &mut Ctx, cte: &FromClause) -> CraftResult<String> {
    let alias = cte
        .alias()
        .ok_or_else(|| CraftError::structural("No alias found for the CTE query"))?;
    let name = ctx.quote(alias);

    let body = match cte {
        FromClause::Subquery(query) => {
            // Nested CTEs were hoisted into the outer prologue.
            let mut body = (**query).clone();
            body.components.clear(Component::Cte);
            compile_select(ctx, &body)?
        }
        FromClause::Raw {
            expression,
            bindings,
            ..
        } => ctx.raw(expression, bindings)?,
        FromClause::AdHoc {
            columns, values, ..
        } => compile_adhoc(ctx, columns, values)?,
        FromClause::Table(table) => format!("SELECT * FROM {}", ctx.wrap_table(table)),
    };

    Ok(format!("{} AS ({})", name, body))
}

fn compile_adhoc(ctx: &mut Ctx, columns: &[String], values: &[Value]) -> CraftResult<String> {
    if columns.is_empty() || values.is_empty() || values.len() % columns.len() != 0 {
        return Err(CraftError::structural(
            "Ad-hoc table rows must match the column count",
        ));
    }

    let quoted = columns.iter().map(|c| ctx.quote(c)).collect::<Vec<_>>();
    match ctx.generator.adhoc_style() {
        AdHocStyle::Values => {
            let rows = values
                .chunks(columns.len())
                .map(|row| ctx.parameterize(row).map(|list| format!("({})", list)))
                .collect::<CraftResult<Vec<_>>>()?;
            let list = quoted.join(", ");
            Ok(format!(
                "SELECT {} FROM (VALUES {}) {}tbl ({})",
                list,
                rows.join(", "),
                ctx.generator.table_alias_keyword(),
                list
            ))
        }
        AdHocStyle::UnionAll => {
            let from = ctx
                .generator
                .dummy_table()
                .map(|table| format!(" FROM {}", table))
                .unwrap_or_default();
            let alias_keyword = ctx.generator.column_alias_keyword();
            let rows = values
                .chunks(columns.len())
                .map(|row| {
                    let cells = row
                        .iter()
                        .zip(&quoted)
                        .map(|(value, column)| {
                            ctx.parameter(value)
                                .map(|p| format!("{} {}{}", p, alias_keyword, column))
                        })
                        .collect::<CraftResult<Vec<_>>>()?;
                    Ok(format!("SELECT {}{}", cells.join(", "), from))
                })
                .collect::<CraftResult<Vec<_>>>()?;
            Ok(rows.join(" UNION ALL "))
        }
    }
}
