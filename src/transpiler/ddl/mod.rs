//! CREATE / DROP / TRUNCATE TABLE.
//!
//! Each dialect supplies a [`DdlFormat`]: a statement template with named
//! slots plus type and identity spellings. The filler below reads the table
//! clauses of a query and fills the slots.

mod formats;

pub use self::formats::{
    FirebirdDdl, GenericDdl, MysqlDdl, OracleDdl, PostgresDdl, SqlServerDdl, SqliteDdl,
};

use crate::ast::{
    Clause, ClauseKind, Component, DataType, FromClause, Query, TableColumn, TableExtension,
    TableKind,
};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::compile_select;

/// Dialect strategy for table DDL.
pub trait DdlFormat: Send + Sync {
    /// CREATE TABLE template. Slots: `{temp}`, `{table}`, `{columns}`,
    /// `{primary}`, `{unique}`, `{extension}`.
    fn template(&self) -> &'static str {
        "CREATE {temp}TABLE {table} (\n{columns}{primary}{unique}\n){extension}"
    }

    fn type_name(&self, data_type: &DataType) -> String {
        generic_type(data_type)
    }

    fn identity_keyword(&self) -> &'static str {
        "GENERATED ALWAYS AS IDENTITY"
    }

    /// The identity keyword already declares the primary key.
    fn identity_implies_primary_key(&self) -> bool {
        false
    }

    fn temporary_keyword(&self) -> &'static str {
        "TEMPORARY "
    }

    /// Name of a temporary table, before quoting.
    fn temporary_name(&self, name: &str) -> String {
        name.to_string()
    }

    /// Clause after a temporary table definition.
    fn on_commit(&self, _preserve_rows: bool) -> Option<&'static str> {
        None
    }

    fn truncate(&self, table: &str) -> String {
        format!("TRUNCATE TABLE {}", table)
    }

    fn create_as(&self, temp: &str, table: &str, select: &str) -> CraftResult<String> {
        Ok(format!("CREATE {}TABLE {} AS ({})", temp, table, select))
    }
}

pub(crate) fn generic_type(data_type: &DataType) -> String {
    match data_type {
        DataType::SmallInt => "SMALLINT".to_string(),
        DataType::Integer => "INTEGER".to_string(),
        DataType::BigInt => "BIGINT".to_string(),
        DataType::Decimal { precision, scale } => format!("DECIMAL({}, {})", precision, scale),
        DataType::Float => "REAL".to_string(),
        DataType::Double => "DOUBLE PRECISION".to_string(),
        DataType::Boolean => "BOOLEAN".to_string(),
        DataType::Char(n) => format!("CHAR({})", n),
        DataType::Varchar(n) => format!("VARCHAR({})", n),
        DataType::Text => "TEXT".to_string(),
        DataType::Date => "DATE".to_string(),
        DataType::Time => "TIME".to_string(),
        DataType::Timestamp => "TIMESTAMP".to_string(),
        DataType::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),
        DataType::Uuid => "UUID".to_string(),
        DataType::Binary => "BLOB".to_string(),
        DataType::Json => "JSON".to_string(),
        DataType::Custom(name) => name.clone(),
    }
}

/// Substitute `{slot}` markers in a single pass.
fn fill(template: &str, slot: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find('}').and_then(|end| slot(&tail[1..end]).map(|v| (end, v))) {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_temporary(query: &Query, ctx: &Ctx) -> bool {
    query
        .components
        .get_one(Component::TableKind, ctx.engine())
        .is_some_and(|c| matches!(c.kind, ClauseKind::TableKind(TableKind::Temporary)))
}

fn preserve_rows(query: &Query, ctx: &Ctx) -> bool {
    query
        .components
        .get_one(Component::TableExtension, ctx.engine())
        .is_some_and(|c| {
            matches!(
                c.kind,
                ClauseKind::TableExtension(TableExtension::OnCommitPreserveRows(true))
            )
        })
}

/// Quoted table name of a DDL statement.
fn table_name(ctx: &Ctx, query: &Query, temporary: bool) -> CraftResult<String> {
    let Some(FromClause::Table(table)) = query.get_from(ctx.engine()) else {
        return Err(CraftError::structural("No table set for the table statement"));
    };
    let name = ctx.prefixed(table.trim());
    let name = if temporary {
        ctx.generator.ddl().temporary_name(&name)
    } else {
        name
    };
    Ok(ctx.wrap(&name))
}

fn column_line(ctx: &Ctx, format: &dyn DdlFormat, column: &TableColumn) -> String {
    let mut line = format!(
        "    {} {}",
        ctx.quote(&column.name),
        format.type_name(&column.data_type)
    );
    if column.identity {
        line.push(' ');
        line.push_str(format.identity_keyword());
    } else if column.nullable {
        line.push_str(" NULL");
    } else {
        line.push_str(" NOT NULL");
    }
    line.push_str(",\n");
    line
}

fn key_block(ctx: &Ctx, keyword: &str, columns: &[&TableColumn]) -> String {
    if columns.is_empty() {
        return String::new();
    }
    let list = columns
        .iter()
        .map(|c| ctx.quote(&c.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("    {} ({}),\n", keyword, list)
}

pub fn compile_create_table(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let format = ctx.generator.ddl();
    let engine = ctx.engine();
    let columns = query
        .components
        .get(Component::TableColumn, engine)
        .filter_map(Clause::as_table_column)
        .collect::<Vec<_>>();

    if columns.is_empty() {
        return Err(CraftError::structural("CREATE TABLE needs at least one column"));
    }
    if columns.iter().filter(|c| c.identity).count() > 1 {
        return Err(CraftError::validation(
            "A table can have only one identity column",
        ));
    }

    let temporary = is_temporary(query, ctx);
    let table = table_name(ctx, query, temporary)?;

    let primary = columns
        .iter()
        .copied()
        .filter(|c| c.primary_key && !(c.identity && format.identity_implies_primary_key()))
        .collect::<Vec<_>>();
    let unique = columns.iter().copied().filter(|c| c.unique).collect::<Vec<_>>();

    let mut blocks = [
        columns.iter().map(|c| column_line(ctx, format, c)).collect::<String>(),
        key_block(ctx, "PRIMARY KEY", &primary),
        key_block(ctx, "UNIQUE", &unique),
    ];
    if let Some(last) = blocks.iter_mut().rev().find(|b| !b.is_empty()) {
        let trimmed = last.trim_end_matches(",\n").len();
        last.truncate(trimmed);
    }
    let [columns, primary, unique] = blocks;

    let extension = if temporary {
        format
            .on_commit(preserve_rows(query, ctx))
            .map(|clause| format!(" {}", clause))
            .unwrap_or_default()
    } else {
        String::new()
    };
    let temp = if temporary { format.temporary_keyword() } else { "" };

    Ok(fill(format.template(), |slot| match slot {
        "temp" => Some(temp.to_string()),
        "table" => Some(table.clone()),
        "columns" => Some(columns.clone()),
        "primary" => Some(primary.clone()),
        "unique" => Some(unique.clone()),
        "extension" => Some(extension.clone()),
        _ => None,
    }))
}

pub fn compile_create_table_as(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let format = ctx.generator.ddl();
    let Some(FromClause::Subquery(source)) = query
        .components
        .get_one(Component::TableSource, ctx.engine())
        .and_then(Clause::as_from)
    else {
        return Err(CraftError::structural("CREATE TABLE AS needs a source query"));
    };

    let temporary = is_temporary(query, ctx);
    let table = table_name(ctx, query, temporary)?;
    let select = compile_select(ctx, source)?;
    let temp = if temporary { format.temporary_keyword() } else { "" };
    format.create_as(temp, &table, &select)
}

pub fn compile_drop_table(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let table = table_name(ctx, query, is_temporary(query, ctx))?;
    Ok(format!("DROP TABLE {}", table))
}

pub fn compile_truncate_table(ctx: &mut Ctx, query: &Query) -> CraftResult<String> {
    let table = table_name(ctx, query, is_temporary(query, ctx))?;
    Ok(ctx.generator.ddl().truncate(&table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_leaves_unknown_braces() {
        let out = fill("A {x} {y} {", |slot| (slot == "x").then(|| "1".to_string()));
        assert_eq!(out, "A 1 {y} {");
    }
}
