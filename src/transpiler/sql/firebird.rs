use crate::ast::{DatePart, LockMode, Value};
use crate::error::CraftResult;
use crate::transpiler::ddl::{DdlFormat, FirebirdDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{MultiInsert, Pagination, SqlGenerator, unsupported_lock};

pub struct FirebirdGenerator;

impl SqlGenerator for FirebirdGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Firebird
    }

    /// Unquoted Firebird names are stored uppercase.
    fn quote_identifier(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        format!("\"{}\"", name.to_uppercase().replace('"', "\"\""))
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn random_order(&self, _seed: Option<&str>) -> String {
        "RAND()".to_string()
    }

    fn pagination(&self) -> Pagination {
        Pagination::FirstSkip
    }

    fn multi_insert(&self) -> MultiInsert {
        MultiInsert::UnionSelect
    }

    fn dummy_table(&self) -> Option<&'static str> {
        Some("RDB$DATABASE")
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
            DatePart::Date | DatePart::Time => {
                format!("CAST({} as {}) {} {}", column, part.keyword(), op, placeholder)
            }
            _ => format!("EXTRACT({} FROM {}) {} {}", part.keyword(), column, op, placeholder),
        }
    }

    fn lock_clause(&self, mode: LockMode) -> CraftResult<String> {
        match mode {
            LockMode::Update => Ok("FOR UPDATE WITH LOCK".to_string()),
            LockMode::Share => Err(unsupported_lock(self.dialect(), mode)),
        }
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &FirebirdDdl
    }
}
