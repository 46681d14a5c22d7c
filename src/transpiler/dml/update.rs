use crate::ast::{Clause, Component, Query, UpdateClause, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::compile_wheres;
use crate::transpiler::dml::target_table;

pub(crate) fn compile_update(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    let table = target_table(ctx, query, "update")?;
    let update = query
        .components
        .get_one(Component::Update, engine)
        .and_then(Clause::as_update)
        .ok_or_else(|| CraftError::structural("Update without columns"))?;

    let assignments = match update {
        UpdateClause::Set { columns, values } => columns
            .iter()
            .zip(values)
            .map(|(column, value)| {
                let column = ctx.wrap(column);
                ctx.parameter(value).map(|p| format!("{} = {}", column, p))
            })
            .collect::<CraftResult<Vec<_>>>()?
            .join(", "),
        UpdateClause::Increment { column, value } => {
            let column = ctx.wrap(column);
            let sign = if *value < 0 { "-" } else { "+" };
            let amount = ctx.parameter(&Value::from(value.unsigned_abs()))?;
            format!("{column} = {column} {sign} {amount}")
        }
    };

    let mut sql = format!("UPDATE {} SET {}", table, assignments);
    if let Some(wheres) = compile_wheres(ctx, query)? {
        sql.push(' ');
        sql.push_str(&wheres);
    }
    Ok(sql)
}
