//! Table definition clauses used by the DDL compiler.

use serde::{Deserialize, Serialize};

/// Portable column types, mapped per dialect by the DDL format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    SmallInt,
    Integer,
    BigInt,
    Decimal { precision: u8, scale: u8 },
    Float,
    Double,
    Boolean,
    Char(u32),
    Varchar(u32),
    Text,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Uuid,
    Binary,
    Json,
    /// Passed through untouched.
    Custom(String),
}

/// A column of a CREATE TABLE statement.
///
/// Columns are NOT NULL unless marked [`nullable`](TableColumn::nullable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    /// Auto-increment / identity column. At most one per table.
    pub identity: bool,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            primary_key: false,
            unique: false,
            identity: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableKind {
    #[default]
    Permanent,
    Temporary,
}

/// Dialect-specific table options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableExtension {
    /// Oracle/Firebird temporary tables: keep rows after commit.
    OnCommitPreserveRows(bool),
}
