use crate::ast::DataType;
use crate::error::{CraftError, CraftResult};
use crate::transpiler::ddl::{DdlFormat, generic_type};

pub struct GenericDdl;

impl DdlFormat for GenericDdl {}

pub struct PostgresDdl;

impl DdlFormat for PostgresDdl {
    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Decimal { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
            DataType::TimestampTz => "TIMESTAMPTZ".to_string(),
            DataType::Binary => "BYTEA".to_string(),
            DataType::Json => "JSONB".to_string(),
            other => generic_type(other),
        }
    }
}

pub struct MysqlDdl;

impl DdlFormat for MysqlDdl {
    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Integer => "INT".to_string(),
            DataType::Float => "FLOAT".to_string(),
            DataType::Double => "DOUBLE".to_string(),
            DataType::Boolean => "TINYINT(1)".to_string(),
            DataType::Timestamp => "DATETIME".to_string(),
            DataType::TimestampTz => "TIMESTAMP".to_string(),
            DataType::Uuid => "CHAR(36)".to_string(),
            other => generic_type(other),
        }
    }

    fn identity_keyword(&self) -> &'static str {
        "AUTO_INCREMENT"
    }
}

pub struct SqliteDdl;

impl DdlFormat for SqliteDdl {
    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::SmallInt | DataType::Integer | DataType::BigInt | DataType::Boolean => {
                "INTEGER".to_string()
            }
            DataType::Decimal { .. } => "NUMERIC".to_string(),
            DataType::Float | DataType::Double => "REAL".to_string(),
            DataType::Binary => "BLOB".to_string(),
            DataType::Custom(name) => name.clone(),
            _ => "TEXT".to_string(),
        }
    }

    fn identity_keyword(&self) -> &'static str {
        "PRIMARY KEY AUTOINCREMENT"
    }

    fn identity_implies_primary_key(&self) -> bool {
        true
    }

    fn truncate(&self, table: &str) -> String {
        format!("DELETE FROM {}", table)
    }
}

pub struct SqlServerDdl;

impl DdlFormat for SqlServerDdl {
    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Integer => "INT".to_string(),
            DataType::Double => "FLOAT".to_string(),
            DataType::Boolean => "BIT".to_string(),
            DataType::Char(n) => format!("NCHAR({})", n),
            DataType::Varchar(n) => format!("NVARCHAR({})", n),
            DataType::Text | DataType::Json => "NVARCHAR(MAX)".to_string(),
            DataType::Timestamp => "DATETIME2".to_string(),
            DataType::TimestampTz => "DATETIMEOFFSET".to_string(),
            DataType::Uuid => "UNIQUEIDENTIFIER".to_string(),
            DataType::Binary => "VARBINARY(MAX)".to_string(),
            other => generic_type(other),
        }
    }

    fn identity_keyword(&self) -> &'static str {
        "IDENTITY(1,1)"
    }

    fn temporary_keyword(&self) -> &'static str {
        ""
    }

    fn temporary_name(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            Some((schema, table)) => format!("{}.#{}", schema, table),
            None => format!("#{}", name),
        }
    }

    fn create_as(&self, _temp: &str, table: &str, select: &str) -> CraftResult<String> {
        Ok(format!("SELECT * INTO {} FROM ({}) AS [src]", table, select))
    }
}

pub struct OracleDdl;

impl DdlFormat for OracleDdl {
    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::SmallInt => "NUMBER(5)".to_string(),
            DataType::Integer => "NUMBER(10)".to_string(),
            DataType::BigInt => "NUMBER(19)".to_string(),
            DataType::Decimal { precision, scale } => format!("NUMBER({}, {})", precision, scale),
            DataType::Float => "BINARY_FLOAT".to_string(),
            DataType::Double => "BINARY_DOUBLE".to_string(),
            DataType::Boolean => "NUMBER(1)".to_string(),
            DataType::Varchar(n) => format!("VARCHAR2({})", n),
            DataType::Text | DataType::Json => "CLOB".to_string(),
            DataType::Time => "VARCHAR2(8)".to_string(),
            DataType::Uuid => "RAW(16)".to_string(),
            other => generic_type(other),
        }
    }

    fn identity_keyword(&self) -> &'static str {
        "GENERATED BY DEFAULT ON NULL AS IDENTITY"
    }

    fn temporary_keyword(&self) -> &'static str {
        "GLOBAL TEMPORARY "
    }

    fn on_commit(&self, preserve_rows: bool) -> Option<&'static str> {
        Some(if preserve_rows {
            "ON COMMIT PRESERVE ROWS"
        } else {
            "ON COMMIT DELETE ROWS"
        })
    }
}

pub struct FirebirdDdl;

impl DdlFormat for FirebirdDdl {
    fn type_name(&self, data_type: &DataType) -> String {
        match data_type {
            DataType::Float => "FLOAT".to_string(),
            DataType::Text | DataType::Json => "BLOB SUB_TYPE TEXT".to_string(),
            DataType::Uuid => "CHAR(16) CHARACTER SET OCTETS".to_string(),
            other => generic_type(other),
        }
    }

    fn identity_keyword(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    fn temporary_keyword(&self) -> &'static str {
        "GLOBAL TEMPORARY "
    }

    fn on_commit(&self, preserve_rows: bool) -> Option<&'static str> {
        Some(if preserve_rows {
            "ON COMMIT PRESERVE ROWS"
        } else {
            "ON COMMIT DELETE ROWS"
        })
    }

    fn create_as(&self, _temp: &str, _table: &str, _select: &str) -> CraftResult<String> {
        Err(CraftError::unsupported(
            "Firebird does not support CREATE TABLE AS SELECT",
        ))
    }
}
