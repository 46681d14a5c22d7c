use crate::ast::{DatePart, LockMode, Value};
use crate::transpiler::ddl::{DdlFormat, SqlServerDdl};
use crate::transpiler::dialect::Dialect;
use crate::transpiler::traits::{AdHocStyle, Pagination, SqlGenerator, TableHint};

pub struct SqlServerGenerator {
    pub legacy_pagination: bool,
}

impl SqlGenerator for SqlServerGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "cast(1 as bit)".to_string()
        } else {
            "cast(0 as bit)".to_string()
        }
    }

    fn random_order(&self, _seed: Option<&str>) -> String {
        "NEWID()".to_string()
    }

    fn pagination(&self) -> Pagination {
        if self.legacy_pagination {
            Pagination::TopRowNumber
        } else {
            Pagination::OffsetFetch {
                safe_order: "ORDER BY (SELECT 0) ",
            }
        }
    }

    fn last_insert_id(&self) -> Option<&'static str> {
        Some("SELECT scope_identity() as Id")
    }

    fn adhoc_style(&self) -> AdHocStyle {
        AdHocStyle::Values
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
                format!("CAST({} AS {}) {} {}", column, part.keyword(), op, placeholder)
            }
            _ => format!("DATEPART({}, {}) {} {}", part.keyword(), column, op, placeholder),
        }
    }

    fn table_hints(&self, hints: &[TableHint]) -> String {
        let hints = hints
            .iter()
            .map(|hint| match hint {
                TableHint::NoLock => "NOLOCK".to_string(),
                TableHint::Index(index) => format!("INDEX({})", self.quote_identifier(index)),
                TableHint::Lock(LockMode::Update) => "UPDLOCK, ROWLOCK".to_string(),
                TableHint::Lock(LockMode::Share) => "HOLDLOCK, ROWLOCK".to_string(),
            })
            .collect::<Vec<_>>();
        if hints.is_empty() {
            String::new()
        } else {
            format!(" WITH ({})", hints.join(", "))
        }
    }

    fn lock_as_table_hint(&self) -> bool {
        true
    }

    fn ddl(&self) -> &'static dyn DdlFormat {
        &SqlServerDdl
    }
}
