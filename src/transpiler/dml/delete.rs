use crate::ast::{Component, Query};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::{compile_joins, compile_wheres};
use crate::transpiler::dml::target_table;

/// `DELETE FROM t WHERE ...`. With joins the target alias is named:
/// `DELETE [u] FROM [users] AS [u] INNER JOIN ...`.
pub(crate) fn compile_delete(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    let table = target_table(ctx, query, "delete")?;

    let mut sql = if query.has_component(Component::Join, engine) {
        let alias = query
            .get_from(engine)
            .and_then(|from| from.alias())
            .ok_or_else(|| CraftError::structural("No table set to delete"))?;
        let target = ctx.quote(alias);
        let joins = compile_joins(ctx, query)?.unwrap_or_default();
        format!("DELETE {} FROM {} {}", target, table, joins)
    } else {
        format!("DELETE FROM {}", table)
    };

    if let Some(wheres) = compile_wheres(ctx, query)? {
        sql.push(' ');
        sql.push_str(&wheres);
    }
    Ok(sql)
}
