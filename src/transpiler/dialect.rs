use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CompilerOptions;
use crate::error::CraftError;
use crate::transpiler::sql::firebird::FirebirdGenerator;
use crate::transpiler::sql::generic::GenericGenerator;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::oracle::OracleGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    SqlServer,
    MySQL,
    Postgres,
    SQLite,
    Oracle,
    Firebird,
}

impl Dialect {
    pub const ALL: [Dialect; 7] = [
        Dialect::Generic,
        Dialect::SqlServer,
        Dialect::MySQL,
        Dialect::Postgres,
        Dialect::SQLite,
        Dialect::Oracle,
        Dialect::Firebird,
    ];

    /// Stable identifier, also accepted by `FromStr`.
    pub fn code(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::SqlServer => "sqlserver",
            Dialect::MySQL => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::SQLite => "sqlite",
            Dialect::Oracle => "oracle",
            Dialect::Firebird => "firebird",
        }
    }

    pub fn generator(&self, options: &CompilerOptions) -> Box<dyn SqlGenerator> {
        match self {
            Dialect::Generic => Box::new(GenericGenerator),
            Dialect::SqlServer => Box::new(SqlServerGenerator {
                legacy_pagination: options.legacy_pagination,
            }),
            Dialect::MySQL => Box::new(MysqlGenerator),
            Dialect::Postgres => Box::new(PostgresGenerator),
            Dialect::SQLite => Box::new(SqliteGenerator),
            Dialect::Oracle => Box::new(OracleGenerator {
                legacy_pagination: options.legacy_pagination,
            }),
            Dialect::Firebird => Box::new(FirebirdGenerator),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Dialect {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Dialect::ALL
            .into_iter()
            .find(|d| d.code() == code)
            .ok_or_else(|| {
                CraftError::config(format!(
                    "Unknown dialect '{}'. Expected one of: sqlserver, mysql, postgres, sqlite, oracle, firebird, generic",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_codes_round_trip() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.code().parse::<Dialect>(), Ok(dialect));
        }
        assert_eq!(" MySQL ".parse::<Dialect>(), Ok(Dialect::MySQL));
    }

    #[test]
    fn test_unknown_dialect_is_config_error() {
        let err = "db2".parse::<Dialect>().unwrap_err();
        assert!(matches!(err, CraftError::Config(_)));
    }
}
