use crate::ast::{DatePart, Value};
use crate::transpiler::ddl::{DdlFormat, PostgresDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::SqlGenerator;

pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn supports_filter_clause(&self) -> bool {
        true
    }

    fn case_insensitive_like(&self) -> Option<&'static str> {
        Some("ILIKE")
    }

    fn last_insert_id(&self) -> Option<&'static str> {
        Some("SELECT lastval() AS id")
    }

    fn date_condition(
        &self,
        column: &str,
        part: DatePart,
        op: &str,
        placeholder: &str,
        _value: &Value,
    ) -> String {
        match part {
            DatePart::Date => format!("{}::date {} {}", column, op, placeholder),
            DatePart::Time => format!("{}::time {} {}", column, op, placeholder),
            _ => format!("DATE_PART('{}', {}) {} {}", part.keyword(), column, op, placeholder),
        }
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &PostgresDdl
    }
}
