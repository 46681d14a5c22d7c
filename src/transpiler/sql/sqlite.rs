use crate::ast::{DatePart, LockMode, Value};
use crate::error::CraftResult;
use crate::transpiler::ddl::{DdlFormat, SqliteDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{Pagination, SqlGenerator, unsupported_lock};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn parameter_prefix(&self) -> Option<&'static str> {
        None
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset {
            unbounded: Some("-1"),
        }
    }

    fn supports_filter_clause(&self) -> bool {
        true
    }

    fn last_insert_id(&self) -> Option<&'static str> {
        Some("select last_insert_rowid() as id")
    }

    fn date_condition(
        &self,
        column: &str,
        part: DatePart,
        op: &str,
        placeholder: &str,
        _value: &Value,
    ) -> String {
        let format = match part {
            DatePart::Date => "%Y-%m-%d",
            DatePart::Time => "%H:%M:%S",
            DatePart::Year => "%Y",
            DatePart::Month => "%m",
            DatePart::Day => "%d",
            DatePart::Hour => "%H",
            DatePart::Minute => "%M",
            DatePart::Second => "%S",
        };
        format!(
            "strftime('{}', {}) {} cast({} as text)",
            format, column, op, placeholder
        )
    }

    fn lock_clause(&self, mode: LockMode) -> CraftResult<String> {
        Err(unsupported_lock(self.dialect(), mode))
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &SqliteDdl
    }
}
