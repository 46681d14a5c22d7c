//! Data statements: SELECT, aggregates, INSERT, UPDATE, DELETE.

pub(crate) mod aggregate;
pub(crate) mod cte;
pub(crate) mod delete;
pub(crate) mod insert;
pub(crate) mod pagination;
pub mod select;
pub(crate) mod update;

use crate::ast::{FromClause, Method, Query};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;

/// Compile a top-level DML statement with its `WITH` prologue.
pub fn compile_statement(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    ctx.enter(query);
    let sql = statement(ctx, query);
    ctx.leave();
    sql
}

fn statement(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let prologue = cte::compile_ctes(ctx, query)?;
    let body = match query.method {
        Method::Select | Method::Aggregate => select::select_body(ctx, query)?,
        Method::Insert => insert::compile_insert(ctx, query)?,
        Method::Update => update::compile_update(ctx, query)?,
        Method::Delete => delete::compile_delete(ctx, query)?,
        other => {
            return Err(CraftError::unsupported(format!(
                "{} is not a data statement",
                other
            )));
        }
    };
    Ok(match prologue {
        Some(prologue) => format!("{} {}", prologue, body),
        None => body,
    })
}

/// Quoted target of a mutation: a plain table or a raw expression.
pub(crate) fn target_table(ctx: &mut Ctx, query: &Query, verb: &str) -> CraftResult<String> {
    match query.get_from(ctx.engine()) {
        Some(FromClause::Table(table)) => Ok(ctx.wrap_table(table)),
        Some(FromClause::Raw {
            expression,
            bindings,
            ..
        }) => ctx.raw(expression, bindings),
        _ => Err(CraftError::structural(format!("No table set to {}", verb))),
    }
}
