//! WHERE / HAVING / ON condition rendering.

use crate::ast::{Clause, ClauseKind, Column, Component, Condition, ConditionKind, Query, Value};
use crate::error::{CraftError, CraftResult};
use crate::transpiler::context::Ctx;
use crate::transpiler::dml::select::compile_select;

/// Render a condition list. Every condition after the first is prefixed with
/// `AND ` or `OR ` from its own flag; conditions that render empty are
/// skipped.
pub fn compile_conditions<'a>(
    ctx: &mut Ctx,
    conditions: impl IntoIterator<Item = &'a Condition>,
) -> CraftResult<String> {
    let mut sql = String::new();
    for condition in conditions {
        let Some(compiled) = compile_condition(ctx, condition)? else {
            continue;
        };
        if !sql.is_empty() {
            sql.push_str(if condition.is_or { " OR " } else { " AND " });
        }
        sql.push_str(&compiled);
    }
    Ok(sql)
}

fn negate(sql: String, is_not: bool) -> String {
    if is_not { format!("NOT ({})", sql) } else { sql }
}

fn not_keyword(is_not: bool) -> &'static str {
    if is_not { "NOT " } else { "" }
}

pub fn compile_condition(ctx: &mut Ctx, condition: &Condition) -> CraftResult<Option<String>> {
    let is_not = condition.is_not;
    let sql = match &condition.kind {
        ConditionKind::Basic {
            column,
            operator,
            value,
        } => {
            let column = ctx.wrap(column);
            let placeholder = ctx.parameter(value)?;
            negate(format!("{} {} {}", column, operator.sql_symbol(), placeholder), is_not)
        }

        ConditionKind::BasicString {
            column,
            matching,
            value,
            case_sensitive,
            escape,
        } => {
            let Value::String(text) = ctx.resolve_value(value)? else {
                return Err(CraftError::structural(format!(
                    "String condition on '{}' expects a string value",
                    column
                )));
            };

            let mut column = ctx.wrap(column);
            let mut text = text;
            let mut keyword = "LIKE";
            if !case_sensitive {
                match ctx.generator.case_insensitive_like() {
                    Some(native) => keyword = native,
                    None => {
                        column = ctx.generator.lower(&column);
                        text = text.to_lowercase();
                    }
                }
            }

            let placeholder = ctx.parameter(&Value::String(matching.pattern(&text)))?;
            let mut sql = format!("{} {} {}", column, keyword, placeholder);
            if let Some(escape) = escape {
                sql.push_str(&format!(" ESCAPE '{}'", escape));
            }
            negate(sql, is_not)
        }

        ConditionKind::BasicDate {
            part,
            column,
            operator,
            value,
        } => {
            let column = ctx.wrap(column);
            let value = ctx.resolve_value(value)?;
            let placeholder = ctx.parameter(&value)?;
            let sql = ctx.generator.date_condition(
                &column,
                *part,
                operator.sql_symbol(),
                &placeholder,
                &value,
            );
            negate(sql, is_not)
        }

        ConditionKind::TwoColumns {
            first,
            operator,
            second,
        } => format!(
            "{}{} {} {}",
            not_keyword(is_not),
            ctx.wrap(first),
            operator.sql_symbol(),
            ctx.wrap(second)
        ),

        ConditionKind::Null { column } => {
            format!("{} IS {}NULL", ctx.wrap(column), not_keyword(is_not))
        }

        ConditionKind::Boolean { column, value } => {
            let op = if is_not { "!=" } else { "=" };
            format!("{} {} {}", ctx.wrap(column), op, ctx.generator.bool_literal(*value))
        }

        ConditionKind::Between {
            column,
            lower,
            higher,
        } => {
            let column = ctx.wrap(column);
            let lower = ctx.parameter(lower)?;
            let higher = ctx.parameter(higher)?;
            format!("{} {}BETWEEN {} AND {}", column, not_keyword(is_not), lower, higher)
        }

        ConditionKind::In { column, values } => {
            let list = ctx.parameterize(values)?;
            if list.is_empty() {
                return Ok(Some(if is_not {
                    "1 = 1 /* NOT IN [empty list] */".to_string()
                } else {
                    "1 = 0 /* IN [empty list] */".to_string()
                }));
            }
            format!("{} {}IN ({})", ctx.wrap(column), not_keyword(is_not), list)
        }

        ConditionKind::InSubquery { column, query } => {
            let column = ctx.wrap(column);
            let subquery = compile_select(ctx, query)?;
            format!("{} {}IN ({})", column, not_keyword(is_not), subquery)
        }

        ConditionKind::Exists { query } => {
            let engine = ctx.engine();
            if !query.has_component(Component::From, engine) {
                return Err(CraftError::structural(
                    "Expected a 'from' clause on the EXISTS subquery",
                ));
            }
            let subquery = if ctx.options.omit_select_inside_exists {
                let mut trimmed = (**query).clone();
                trimmed.components.clear(Component::Select);
                trimmed.components.add(Clause::new(
                    Component::Select,
                    None,
                    ClauseKind::Column(Column::Raw {
                        expression: "1".to_string(),
                        bindings: Vec::new(),
                    }),
                ));
                compile_select(ctx, &trimmed)?
            } else {
                compile_select(ctx, query)?
            };
            format!("{}EXISTS ({})", not_keyword(is_not), subquery)
        }

        ConditionKind::Nested { query } => {
            let Some(inner) = compile_nested(ctx, query)? else {
                return Ok(None);
            };
            format!("{}({})", not_keyword(is_not), inner)
        }

        ConditionKind::Raw {
            expression,
            bindings,
        } => negate(ctx.raw(expression, bindings)?, is_not),

        ConditionKind::SubqueryComparison {
            query,
            operator,
            value,
        } => {
            let subquery = compile_select(ctx, query)?;
            let placeholder = ctx.parameter(value)?;
            negate(
                format!("({}) {} {}", subquery, operator.sql_symbol(), placeholder),
                is_not,
            )
        }

        ConditionKind::ColumnSubquery {
            column,
            operator,
            query,
        } => {
            let column = ctx.wrap(column);
            let subquery = compile_select(ctx, query)?;
            negate(
                format!("{} {} ({})", column, operator.sql_symbol(), subquery),
                is_not,
            )
        }
    };
    Ok(Some(sql))
}

/// Conditions of a group: its WHERE list, or its HAVING list when it has none.
fn compile_nested(ctx: &mut Ctx, query: &Query) -> CraftResult<Option<String>> {
    let engine = ctx.engine();
    let component = if query.has_component(Component::Where, engine) {
        Component::Where
    } else if query.has_component(Component::Having, engine) {
        Component::Having
    } else {
        return Ok(None);
    };

    ctx.enter(query);
    let sql = compile_conditions(
        ctx,
        query.components.get(component, engine).filter_map(Clause::as_condition),
    );
    ctx.leave();
    let sql = sql?;
    Ok(if sql.is_empty() { None } else { Some(sql) })
}
