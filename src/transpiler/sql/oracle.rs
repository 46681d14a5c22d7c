use crate::ast::{DatePart, LockMode, Value};
use crate::error::CraftResult;
use crate::transpiler::ddl::{DdlFormat, OracleDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{MultiInsert, Pagination, SqlGenerator, unsupported_lock};

pub struct OracleGenerator {
    pub legacy_pagination: bool,
}

impl SqlGenerator for OracleGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn column_alias_keyword(&self) -> &'static str {
        ""
    }

    fn table_alias_keyword(&self) -> &'static str {
        ""
    }

    fn parameter_prefix(&self) -> Option<&'static str> {
        Some(":p")
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn random_order(&self, _seed: Option<&str>) -> String {
        "DBMS_RANDOM.VALUE".to_string()
    }

    fn pagination(&self) -> Pagination {
        if self.legacy_pagination {
            Pagination::RowNum
        } else {
            Pagination::OffsetFetch {
                safe_order: "ORDER BY (SELECT 0 FROM DUAL) ",
            }
        }
    }

    fn multi_insert(&self) -> MultiInsert {
        MultiInsert::InsertAll
    }

    fn dummy_table(&self) -> Option<&'static str> {
        Some("DUAL")
    }

    fn date_condition(
        &self,
        column: &str,
        part: DatePart,
        op: &str,
        placeholder: &str,
        value: &Value,
    ) -> String {
        let format = match part {
            DatePart::Date => "YY-MM-DD",
            DatePart::Time => {
                // "10:30" compares hours and minutes only.
                match value.as_str() {
                    Some(text) if text.matches(':').count() == 1 => "HH24:MI",
                    _ => "HH24:MI:SS",
                }
            }
            _ => {
                return format!(
                    "EXTRACT({} FROM {}) {} {}",
                    part.keyword(),
                    column,
                    op,
                    placeholder
                );
            }
        };
        format!(
            "TO_CHAR({column}, '{format}') {op} TO_CHAR(TO_DATE({placeholder}, '{format}'), '{format}')"
        )
    }

    fn lock_clause(&self, mode: LockMode) -> CraftResult<String> {
        match mode {
            LockMode::Update => Ok("FOR UPDATE".to_string()),
            LockMode::Share => Err(unsupported_lock(self.dialect(), mode)),
        }
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &OracleDdl
    }
}
