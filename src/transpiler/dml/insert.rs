use crate::ast::{Clause, Component, InsertClause, Query, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::compile_select;
use crate::transpiler::dml::target_table;
use crate::transpiler::traits::MultiInsert;

pub(crate) fn compile_insert(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let engine = ctx.engine();
    let table = target_table(ctx, query, "insert")?;
    let clauses = query
        .components
        .get(Component::Insert, engine)
        .filter_map(Clause::as_insert)
        .collect::<Vec<_>>();

    let Some(first) = clauses.first() else {
        return Err(CraftError::structural("Insert without values"));
    };

    if let InsertClause::Query { columns, query } = first {
        let columns = column_list(ctx, columns);
        let select = compile_select(ctx, query)?;
        return Ok(format!("INSERT INTO {} ({}) {}", table, columns, select));
    }

    let mut rows = Vec::with_capacity(clauses.len());
    let mut return_id = false;
    let mut columns: Option<&[String]> = None;
    for clause in &clauses {
        match clause {
            InsertClause::Values {
                columns: row_columns,
                values,
                return_id: wants_id,
            } => {
                if columns.is_some_and(|c| c != row_columns.as_slice()) {
                    return Err(CraftError::structural(
                        "Every inserted row must use the same columns",
                    ));
                }
                columns = Some(row_columns);
                return_id |= *wants_id;
                rows.push(values.as_slice());
            }
            InsertClause::Query { .. } => {
                return Err(CraftError::structural(
                    "Cannot mix an insert select with inserted rows",
                ));
            }
        }
    }
    let columns = column_list(ctx, columns.unwrap_or_default());

    if rows.len() == 1 {
        let values = ctx.parameterize(rows[0])?;
        let mut sql = format!("INSERT INTO {} ({}) VALUES ({})", table, columns, values);
        if return_id {
            match ctx.generator.last_insert_id() {
                Some(id_query) => {
                    sql.push(';');
                    sql.push_str(id_query);
                }
                None => {
                    return Err(CraftError::unsupported(format!(
                        "{} has no last insert id query",
                        ctx.dialect()
                    )));
                }
            }
        }
        return Ok(sql);
    }

    match ctx.generator.multi_insert() {
        MultiInsert::ValuesList => {
            let values = parameter_rows(ctx, &rows)?
                .into_iter()
                .map(|row| format!("({})", row))
                .collect::<Vec<_>>();
            Ok(format!(
                "INSERT INTO {} ({}) VALUES {}",
                table,
                columns,
                values.join(", ")
            ))
        }
        MultiInsert::InsertAll => {
            let values = parameter_rows(ctx, &rows)?
                .into_iter()
                .map(|row| format!("INTO {} ({}) VALUES ({})", table, columns, row))
                .collect::<Vec<_>>();
            let dummy = ctx.generator.dummy_table().unwrap_or("DUAL");
            Ok(format!("INSERT ALL {} SELECT 1 FROM {}", values.join(" "), dummy))
        }
        MultiInsert::UnionSelect => {
            let from = ctx
                .generator
                .dummy_table()
                .map(|table| format!(" FROM {}", table))
                .unwrap_or_default();
            let selects = parameter_rows(ctx, &rows)?
                .into_iter()
                .map(|row| format!("SELECT {}{}", row, from))
                .collect::<Vec<_>>();
            Ok(format!(
                "INSERT INTO {} ({}) {}",
                table,
                columns,
                selects.join(" UNION ALL ")
            ))
        }
    }
}

fn column_list(ctx: &Ctx, columns: &[String]) -> String {
    columns.iter().map(|c| ctx.wrap(c)).collect::<Vec<_>>().join(", ")
}

fn parameter_rows(ctx: &mut Ctx, rows: &[&[Value]]) -> CraftResult<Vec<String>> {
    rows.iter().map(|row| ctx.parameterize(row.iter())).collect()
}
