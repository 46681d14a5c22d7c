use crate::ast::LockMode;
use crate::error::CraftResult;
use crate::transpiler::ddl::{DdlFormat, MysqlDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{Pagination, SqlGenerator, TableHint};

pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn parameter_prefix(&self) -> Option<&'static str> {
        None
    }

    fn random_order(&self, seed: Option<&str>) -> String {
        match seed {
            Some(seed) => format!("RAND({})", seed),
            None => "RAND()".to_string(),
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset {
            unbounded: Some("18446744073709551615"),
        }
    }

    fn last_insert_id(&self) -> Option<&'static str> {
        Some("SELECT last_insert_id() as Id")
    }

    fn table_hints(&self, hints: &[TableHint]) -> String {
        hints
            .iter()
            .filter_map(|hint| match hint {
                TableHint::Index(index) => {
                    Some(format!(" USE INDEX ({})", self.quote_identifier(index)))
                }
                _ => None,
            })
            .collect()
    }

    fn lock_clause(&self, mode: LockMode) -> CraftResult<String> {
        Ok(match mode {
            LockMode::Update => "FOR UPDATE".to_string(),
            LockMode::Share => "LOCK IN SHARE MODE".to_string(),
        })
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &MysqlDdl
    }
}
